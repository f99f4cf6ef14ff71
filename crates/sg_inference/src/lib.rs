pub mod config;
pub mod device;
pub mod handlers;
pub mod models;
pub mod provider;

pub use config::{BackendKind, DevicePreference, InferenceConfig};
pub use device::Device;
pub use handlers::{SentimentHandler, SummarizationHandler};
pub use provider::{ModelLoader, ModelProvider, SentimentHandle, SummarizerHandle};

pub mod prelude {
    pub use super::config::InferenceConfig;
    pub use super::handlers::{SentimentHandler, SummarizationHandler};
    pub use super::provider::ModelProvider;
    pub use sg_core::{Error, OperationOutcome, Result, SentimentResult, SummaryResult};
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use sg_core::OperationOutcome;
    use crate::prelude::*;
    use crate::BackendKind;

    #[tokio::test]
    async fn test_local_pipeline() {
        let config = InferenceConfig {
            backend: BackendKind::Local,
            ..Default::default()
        };
        let provider = Arc::new(ModelProvider::from_config(&config).unwrap());
        let sentiment = SentimentHandler::new(provider.clone());
        let summarizer = SummarizationHandler::new(provider, false);

        match sentiment.analyze("I love this product, it works great!").await {
            OperationOutcome::Success { result } => {
                assert_eq!(result.label, "POSITIVE");
                assert!(result.score > 0.5);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let text = "Rust is a systems language. It focuses on safety. It also focuses on speed.";
        assert!(summarizer.summarize(text, 50, 150).await.is_success());
    }
}
