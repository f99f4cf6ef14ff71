use std::sync::Arc;
use async_trait::async_trait;
use sg_core::{Result, SentimentModel, SummarizationModel};
use crate::config::{BackendKind, InferenceConfig};
use crate::device::Device;
use crate::provider::ModelLoader;

pub mod extractive;
pub mod http;
pub mod lexicon;

pub use extractive::ExtractiveSummarizer;
pub use http::{HttpSentimentModel, HttpSummarizer};
pub use lexicon::LexiconSentimentModel;

/// Builds pipelines for the backend chosen in the configuration.
#[derive(Debug, Clone)]
pub struct BackendLoader {
    config: InferenceConfig,
}

impl BackendLoader {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ModelLoader for BackendLoader {
    async fn load_sentiment(&self, device: Device) -> Result<Arc<dyn SentimentModel>> {
        match self.config.backend {
            BackendKind::Local => Ok(Arc::new(LexiconSentimentModel::new())),
            BackendKind::Http => Ok(Arc::new(HttpSentimentModel::connect(&self.config, device).await?)),
        }
    }

    async fn load_summarizer(&self, device: Device) -> Result<Arc<dyn SummarizationModel>> {
        match self.config.backend {
            BackendKind::Local => Ok(Arc::new(ExtractiveSummarizer::new())),
            BackendKind::Http => Ok(Arc::new(HttpSummarizer::connect(&self.config, device).await?)),
        }
    }
}
