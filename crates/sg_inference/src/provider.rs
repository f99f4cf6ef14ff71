use std::fmt;
use std::sync::{Arc, OnceLock};
use async_trait::async_trait;
use sg_core::{
    Error, Result, SentimentModel, SentimentResult, SummarizationModel, SummaryParams,
    SummaryResult,
};
use tokio::sync::OnceCell;
use tracing::{error, info};
use crate::config::{DevicePreference, InferenceConfig};
use crate::device::Device;
use crate::models::BackendLoader;

/// Performs the expensive part of bringing a pipeline up.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load_sentiment(&self, device: Device) -> Result<Arc<dyn SentimentModel>>;
    async fn load_summarizer(&self, device: Device) -> Result<Arc<dyn SummarizationModel>>;
}

#[derive(Debug, Clone)]
pub struct SentimentHandle {
    model: Arc<dyn SentimentModel>,
    device: Device,
}

impl SentimentHandle {
    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Whether both handles point at the same loaded model.
    pub fn same_model(&self, other: &SentimentHandle) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }

    pub async fn classify(&self, text: &str) -> Result<Vec<SentimentResult>> {
        self.model.classify(text).await
    }
}

#[derive(Debug, Clone)]
pub struct SummarizerHandle {
    model: Arc<dyn SummarizationModel>,
    device: Device,
}

impl SummarizerHandle {
    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn same_model(&self, other: &SummarizerHandle) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }

    pub async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<Vec<SummaryResult>> {
        self.model.summarize(text, params).await
    }
}

/// Lazily loads both pipelines and keeps them for the rest of the process.
///
/// Each pipeline is loaded at most once, even when several requests ask for
/// it at the same time. A failed load is remembered: from then on every call
/// for either pipeline reports the same initialization failure and nothing is
/// retried.
pub struct ModelProvider {
    loader: Box<dyn ModelLoader>,
    device: Device,
    sentiment: OnceCell<std::result::Result<SentimentHandle, String>>,
    summarizer: OnceCell<std::result::Result<SummarizerHandle, String>>,
    failure: OnceLock<String>,
}

impl fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProvider")
            .field("loader", &"<dyn ModelLoader>")
            .field("device", &self.device)
            .field("sentiment_loaded", &self.sentiment.initialized())
            .field("summarizer_loaded", &self.summarizer.initialized())
            .field("failure", &self.failure.get())
            .finish()
    }
}

impl ModelProvider {
    pub fn new(loader: impl ModelLoader + 'static, preference: DevicePreference) -> Self {
        Self::with_device(loader, Device::resolve(preference))
    }

    pub fn with_device(loader: impl ModelLoader + 'static, device: Device) -> Self {
        info!("🖥️ Inference device selected: {}", device);
        Self {
            loader: Box::new(loader),
            device,
            sentiment: OnceCell::new(),
            summarizer: OnceCell::new(),
            failure: OnceLock::new(),
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(BackendLoader::new(config.clone()), config.device))
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// The first initialization failure, if any pipeline failed to load.
    pub fn failure(&self) -> Option<&str> {
        self.failure.get().map(String::as_str)
    }

    pub fn is_halted(&self) -> bool {
        self.failure.get().is_some()
    }

    pub async fn get_sentiment_model(&self) -> Result<SentimentHandle> {
        self.check_halted()?;
        let cached = self.sentiment.get_or_init(|| self.load_sentiment()).await;
        cached.clone().map_err(Error::Initialization)
    }

    pub async fn get_summarizer(&self) -> Result<SummarizerHandle> {
        self.check_halted()?;
        let cached = self.summarizer.get_or_init(|| self.load_summarizer()).await;
        cached.clone().map_err(Error::Initialization)
    }

    /// Load both pipelines up front.
    pub async fn preload(&self) -> Result<()> {
        self.get_sentiment_model().await?;
        self.get_summarizer().await?;
        Ok(())
    }

    fn check_halted(&self) -> Result<()> {
        match self.failure.get() {
            Some(message) => Err(Error::Initialization(message.clone())),
            None => Ok(()),
        }
    }

    async fn load_sentiment(&self) -> std::result::Result<SentimentHandle, String> {
        info!("🧠 Loading sentiment model on {}", self.device);
        match self.loader.load_sentiment(self.device).await {
            Ok(model) => {
                info!("✨ Sentiment model ready (using {})", model.name());
                Ok(SentimentHandle { model, device: self.device })
            }
            Err(e) => Err(self.record_failure("sentiment", e)),
        }
    }

    async fn load_summarizer(&self) -> std::result::Result<SummarizerHandle, String> {
        info!("🧠 Loading summarization model on {}", self.device);
        match self.loader.load_summarizer(self.device).await {
            Ok(model) => {
                info!("✨ Summarization model ready (using {})", model.name());
                Ok(SummarizerHandle { model, device: self.device })
            }
            Err(e) => Err(self.record_failure("summarization", e)),
        }
    }

    fn record_failure(&self, pipeline: &str, e: Error) -> String {
        let message = match e {
            Error::Initialization(message) => message,
            other => other.to_string(),
        };
        error!("Failed to load {} model: {}", pipeline, message);
        let _ = self.failure.set(message.clone());
        message
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub(crate) struct FixedSentiment;

    #[async_trait]
    impl SentimentModel for FixedSentiment {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn classify(&self, _text: &str) -> Result<Vec<SentimentResult>> {
            Ok(vec![SentimentResult { label: "POSITIVE".to_string(), score: 0.9 }])
        }
    }

    #[derive(Debug)]
    pub(crate) struct EchoSummarizer;

    #[async_trait]
    impl SummarizationModel for EchoSummarizer {
        fn name(&self) -> &str {
            "echo"
        }

        async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<Vec<SummaryResult>> {
            let words: Vec<&str> = text.split_whitespace().take(params.max_length as usize).collect();
            Ok(vec![SummaryResult { summary_text: words.join(" ") }])
        }
    }

    /// Counts how often each pipeline is built.
    #[derive(Default, Clone)]
    pub(crate) struct CountingLoader {
        pub sentiment_loads: Arc<AtomicUsize>,
        pub summarizer_loads: Arc<AtomicUsize>,
        pub fail_with: Option<String>,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        async fn load_sentiment(&self, _device: Device) -> Result<Arc<dyn SentimentModel>> {
            self.sentiment_loads.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.fail_with {
                return Err(Error::Initialization(message.clone()));
            }
            Ok(Arc::new(FixedSentiment))
        }

        async fn load_summarizer(&self, _device: Device) -> Result<Arc<dyn SummarizationModel>> {
            self.summarizer_loads.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.fail_with {
                return Err(Error::Initialization(message.clone()));
            }
            Ok(Arc::new(EchoSummarizer))
        }
    }

    #[tokio::test]
    async fn test_handles_are_memoized() {
        let loader = CountingLoader::default();
        let provider = ModelProvider::with_device(loader.clone(), Device::Cpu);

        let first = provider.get_sentiment_model().await.unwrap();
        let second = provider.get_sentiment_model().await.unwrap();
        assert!(first.same_model(&second));
        assert_eq!(loader.sentiment_loads.load(Ordering::SeqCst), 1);

        let first = provider.get_summarizer().await.unwrap();
        let second = provider.get_summarizer().await.unwrap();
        assert!(first.same_model(&second));
        assert_eq!(loader.summarizer_loads.load(Ordering::SeqCst), 1);
        assert_eq!(first.device(), Device::Cpu);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_loads_once() {
        let loader = CountingLoader::default();
        let provider = Arc::new(ModelProvider::with_device(loader.clone(), Device::Cpu));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.get_sentiment_model().await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        assert_eq!(loader.sentiment_loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_halts_both_pipelines_without_retry() {
        let loader = CountingLoader {
            fail_with: Some("weights not found".to_string()),
            ..Default::default()
        };
        let provider = ModelProvider::with_device(loader.clone(), Device::Cpu);

        let err = provider.get_sentiment_model().await.unwrap_err();
        assert!(err.is_initialization());
        assert_eq!(err.to_string(), "Model initialization failed: weights not found");
        assert!(provider.is_halted());
        assert_eq!(provider.failure(), Some("weights not found"));

        // the summarizer is never attempted once the session is halted
        assert!(provider.get_summarizer().await.unwrap_err().is_initialization());
        assert!(provider.get_sentiment_model().await.unwrap_err().is_initialization());
        assert_eq!(loader.sentiment_loads.load(Ordering::SeqCst), 1);
        assert_eq!(loader.summarizer_loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preload_loads_both() {
        let loader = CountingLoader::default();
        let provider = ModelProvider::with_device(loader.clone(), Device::Cuda(0));
        provider.preload().await.unwrap();
        assert_eq!(loader.sentiment_loads.load(Ordering::SeqCst), 1);
        assert_eq!(loader.summarizer_loads.load(Ordering::SeqCst), 1);
        assert_eq!(provider.get_sentiment_model().await.unwrap().device(), Device::Cuda(0));
        assert!(!provider.is_halted());
    }
}
