use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sg_core::{
    Error, Result, SentimentModel, SentimentResult, SummarizationModel, SummaryParams,
    SummaryResult,
};
use url::Url;
use crate::config::InferenceConfig;
use crate::device::Device;

#[derive(Serialize)]
struct InferenceRequest<'a, P: Serialize> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<P>,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    use_gpu: bool,
    use_cache: bool,
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<SentimentResult>>),
    Flat(Vec<SentimentResult>),
}

impl ClassificationResponse {
    fn into_results(self) -> Vec<SentimentResult> {
        match self {
            ClassificationResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            ClassificationResponse::Flat(results) => results,
        }
    }
}

/// One hosted model reachable over HTTP.
struct Endpoint {
    client: Client,
    url: Url,
    model: String,
    api_token: Option<String>,
    use_gpu: bool,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("client", &"<reqwest::Client>")
            .field("url", &self.url.as_str())
            .field("model", &self.model)
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("use_gpu", &self.use_gpu)
            .finish()
    }
}

impl Endpoint {
    fn new(config: &InferenceConfig, model: &str, device: Device) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            url: config.model_url(model)?,
            model: model.to_string(),
            api_token: config.api_token.clone(),
            use_gpu: device.is_accelerated(),
        })
    }

    async fn invoke<P, R>(&self, inputs: &str, parameters: Option<P>, use_cache: bool) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = InferenceRequest {
            inputs,
            parameters,
            options: InferenceOptions {
                use_gpu: self.use_gpu,
                use_cache,
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(self.url.clone()).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(Error::Inference(format!("{} returned {}: {}", self.model, status, message)));
        }
        if let Ok(e) = serde_json::from_str::<ErrorBody>(&body) {
            return Err(Error::Inference(format!("{}: {}", self.model, e.error)));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::Inference(format!("unexpected response from {}: {}", self.model, e))
        })
    }
}

#[derive(Debug)]
pub struct HttpSentimentModel {
    endpoint: Endpoint,
}

impl HttpSentimentModel {
    pub fn new(config: &InferenceConfig, device: Device) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::new(config, &config.sentiment_model, device)?,
        })
    }

    /// Build the model and, when asked to, check that the service answers.
    pub async fn connect(config: &InferenceConfig, device: Device) -> Result<Self> {
        let model = Self::new(config, device)?;
        if config.warmup {
            if let Err(e) = model.classify("warmup").await {
                return Err(Error::Initialization(format!(
                    "{} is not available at {}: {}",
                    model.endpoint.model, model.endpoint.url, e
                )));
            }
        }
        Ok(model)
    }
}

#[async_trait]
impl SentimentModel for HttpSentimentModel {
    fn name(&self) -> &str {
        &self.endpoint.model
    }

    async fn classify(&self, text: &str) -> Result<Vec<SentimentResult>> {
        let response: ClassificationResponse =
            self.endpoint.invoke::<(), _>(text, None, true).await?;
        let mut results = response.into_results();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        tracing::debug!("{} classified input: {:?}", self.endpoint.model, results);
        Ok(results)
    }
}

#[derive(Debug)]
pub struct HttpSummarizer {
    endpoint: Endpoint,
}

impl HttpSummarizer {
    pub fn new(config: &InferenceConfig, device: Device) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::new(config, &config.summarization_model, device)?,
        })
    }

    pub async fn connect(config: &InferenceConfig, device: Device) -> Result<Self> {
        let model = Self::new(config, device)?;
        if config.warmup {
            let params = SummaryParams {
                min_length: 1,
                max_length: 8,
                do_sample: false,
            };
            if let Err(e) = model.summarize("Warm up the summarization model.", &params).await {
                return Err(Error::Initialization(format!(
                    "{} is not available at {}: {}",
                    model.endpoint.model, model.endpoint.url, e
                )));
            }
        }
        Ok(model)
    }
}

#[async_trait]
impl SummarizationModel for HttpSummarizer {
    fn name(&self) -> &str {
        &self.endpoint.model
    }

    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<Vec<SummaryResult>> {
        // sampled output must not be served from the service's cache
        self.endpoint.invoke(text, Some(*params), !params.do_sample).await
    }
}
