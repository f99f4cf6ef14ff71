use std::fmt;
use clap::ValueEnum;
use sg_core::{Error, Result};
use url::Url;

pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Where the two pipelines run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendKind {
    /// Hosted models behind a Hugging Face Inference API compatible service.
    #[default]
    Http,
    /// Built-in lexicon classifier and extractive summarizer, no network.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Gpu,
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub backend: BackendKind,
    pub base_url: String,
    pub api_token: Option<String>,
    pub sentiment_model: String,
    pub summarization_model: String,
    pub device: DevicePreference,
    pub do_sample: bool,
    pub warmup: bool,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("sentiment_model", &self.sentiment_model)
            .field("summarization_model", &self.summarization_model)
            .field("device", &self.device)
            .field("do_sample", &self.do_sample)
            .field("warmup", &self.warmup)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            device: DevicePreference::default(),
            do_sample: true,
            warmup: true,
        }
    }
}

impl InferenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sentiment_model.trim().is_empty() {
            return Err(Error::Config("sentiment model name must not be empty".to_string()));
        }
        if self.summarization_model.trim().is_empty() {
            return Err(Error::Config("summarization model name must not be empty".to_string()));
        }
        if self.backend == BackendKind::Http {
            self.model_url(&self.sentiment_model)?;
        }
        Ok(())
    }

    /// Endpoint serving `model`, e.g. `{base_url}/models/facebook/bart-large-cnn`.
    pub fn model_url(&self, model: &str) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("{} cannot be used as a base URL", self.base_url)));
        }
        // join() drops the last path segment unless it ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&format!("models/{}", model.trim_matches('/')))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url() {
        let config = InferenceConfig::default();
        let url = config.model_url(DEFAULT_SUMMARIZATION_MODEL).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
        );

        let config = InferenceConfig {
            base_url: "http://localhost:8080/proxy".to_string(),
            ..Default::default()
        };
        let url = config.model_url("sst2").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/models/sst2");
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let config = InferenceConfig {
            backend: BackendKind::Http,
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        let config = InferenceConfig {
            sentiment_model: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        assert!(InferenceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_use_pretrained_models() {
        let config = InferenceConfig::default();
        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.sentiment_model, DEFAULT_SENTIMENT_MODEL);
        assert_eq!(config.summarization_model, DEFAULT_SUMMARIZATION_MODEL);
        assert!(config.do_sample);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = InferenceConfig {
            api_token: Some("hf_secret".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hf_secret"));
        assert!(printed.contains("<redacted>"));
    }
}
