use serde::{Deserialize, Serialize};

/// Lower and upper slider limits for the minimum summary length.
pub const MIN_LENGTH_RANGE: (u32, u32) = (30, 100);
/// Lower and upper slider limits for the maximum summary length.
pub const MAX_LENGTH_RANGE: (u32, u32) = (100, 300);
pub const DEFAULT_MIN_LENGTH: u32 = 50;
pub const DEFAULT_MAX_LENGTH: u32 = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationRequest {
    pub text: String,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
}

fn default_min_length() -> u32 {
    DEFAULT_MIN_LENGTH
}

fn default_max_length() -> u32 {
    DEFAULT_MAX_LENGTH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub score: f32,
}

impl SentimentResult {
    /// Confidence as shown to the user, e.g. `99.87%`.
    pub fn confidence(&self) -> String {
        format_percentage(self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary_text: String,
}

/// Parameters handed to a summarization model as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryParams {
    pub min_length: u32,
    pub max_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            do_sample: true,
        }
    }
}

/// Formats a probability in `[0, 1]` as a percentage with two decimals.
pub fn format_percentage(score: f32) -> String {
    format!("{:.2}%", f64::from(score) * 100.0)
}

/// True when the text carries nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
