use std::sync::Arc;
use sg_core::types::is_blank;
use sg_core::{Error, OperationOutcome, Result, SentimentResult, SummaryParams, SummaryResult};
use tracing::{debug, info, warn};
use crate::provider::ModelProvider;

pub const EMPTY_ANALYSIS_INPUT: &str = "Please enter some text to analyze.";
pub const EMPTY_SUMMARY_INPUT: &str = "Please enter some text to summarize.";

#[derive(Debug, Clone)]
pub struct SentimentHandler {
    provider: Arc<ModelProvider>,
}

impl SentimentHandler {
    pub fn new(provider: Arc<ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn analyze(&self, text: &str) -> OperationOutcome<SentimentResult> {
        if is_blank(text) {
            warn!("Sentiment analysis requested without input");
            return OperationOutcome::warning(EMPTY_ANALYSIS_INPUT);
        }

        match self.classify(text).await {
            Ok(result) => {
                info!("Sentiment: {} ({})", result.label, result.confidence());
                OperationOutcome::success(result)
            }
            Err(e) => {
                warn!("Sentiment analysis failed: {}", e);
                OperationOutcome::from_error("analyzing sentiment", &e)
            }
        }
    }

    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let model = self.provider.get_sentiment_model().await?;
        debug!("Classifying {} chars with {}", text.len(), model.name());
        let result = model
            .classify(text)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Inference("model returned no classification".to_string()))?;

        if result.label.trim().is_empty() {
            return Err(Error::Inference("model returned an empty label".to_string()));
        }
        if !(0.0..=1.0).contains(&result.score) {
            return Err(Error::Inference(format!(
                "model returned a score outside [0, 1]: {}",
                result.score
            )));
        }
        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct SummarizationHandler {
    provider: Arc<ModelProvider>,
    do_sample: bool,
}

impl SummarizationHandler {
    /// `do_sample` switches the model between sampled and deterministic
    /// decoding.
    pub fn new(provider: Arc<ModelProvider>, do_sample: bool) -> Self {
        Self { provider, do_sample }
    }

    pub fn do_sample(&self) -> bool {
        self.do_sample
    }

    /// Bounds are forwarded to the model unchanged, including inverted ones.
    pub async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> OperationOutcome<SummaryResult> {
        if is_blank(text) {
            warn!("Summary requested without input");
            return OperationOutcome::warning(EMPTY_SUMMARY_INPUT);
        }

        let params = SummaryParams {
            min_length,
            max_length,
            do_sample: self.do_sample,
        };
        match self.generate(text, &params).await {
            Ok(result) => {
                info!(
                    "Generated summary of {} words (bounds {}..{})",
                    result.summary_text.split_whitespace().count(),
                    min_length,
                    max_length
                );
                OperationOutcome::success(result)
            }
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                OperationOutcome::from_error("generating summary", &e)
            }
        }
    }

    async fn generate(&self, text: &str, params: &SummaryParams) -> Result<SummaryResult> {
        let model = self.provider.get_summarizer().await?;
        debug!("Summarizing {} chars with {} ({:?})", text.len(), model.name(), params);
        model
            .summarize(text, params)
            .await?
            .into_iter()
            .next()
            .filter(|summary| !summary.summary_text.trim().is_empty())
            .ok_or_else(|| Error::Inference("model returned no summary".to_string()))
    }
}
