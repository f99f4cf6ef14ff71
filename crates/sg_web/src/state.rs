use std::sync::Arc;
use chrono::{DateTime, Utc};
use sg_inference::{InferenceConfig, ModelProvider, SentimentHandler, SummarizationHandler};

/// Model names shown on the page.
#[derive(Debug, Clone)]
pub struct ModelNames {
    pub sentiment: String,
    pub summarization: String,
}

impl From<&InferenceConfig> for ModelNames {
    fn from(config: &InferenceConfig) -> Self {
        Self {
            sentiment: config.sentiment_model.clone(),
            summarization: config.summarization_model.clone(),
        }
    }
}

pub struct AppState {
    pub provider: Arc<ModelProvider>,
    pub sentiment: SentimentHandler,
    pub summarizer: SummarizationHandler,
    pub models: ModelNames,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(provider: Arc<ModelProvider>, models: ModelNames, do_sample: bool) -> Self {
        Self {
            sentiment: SentimentHandler::new(provider.clone()),
            summarizer: SummarizationHandler::new(provider.clone(), do_sample),
            provider,
            models,
            started_at: Utc::now(),
        }
    }

    pub fn from_config(config: &InferenceConfig) -> sg_core::Result<Self> {
        let provider = Arc::new(ModelProvider::from_config(config)?);
        Ok(Self::new(provider, ModelNames::from(config), config.do_sample))
    }
}
