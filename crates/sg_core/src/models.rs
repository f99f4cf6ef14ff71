use std::fmt;
use async_trait::async_trait;
use crate::types::{SentimentResult, SummaryParams, SummaryResult};
use crate::Result;

#[async_trait]
pub trait SentimentModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Classify a piece of text. Implementations return their labels
    /// ordered by score, best first.
    async fn classify(&self, text: &str) -> Result<Vec<SentimentResult>>;
}

#[async_trait]
pub trait SummarizationModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Generate summaries for a piece of text. `params` is forwarded to the
    /// model untouched.
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<Vec<SummaryResult>>;
}
