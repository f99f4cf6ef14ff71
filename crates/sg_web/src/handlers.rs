use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sg_core::types::{
    DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, MAX_LENGTH_RANGE, MIN_LENGTH_RANGE,
};
use sg_core::{AnalysisRequest, Error, OperationOutcome, SentimentResult, SummarizationRequest};
use sg_inference::Device;
use tracing::{info_span, Instrument};
use uuid::Uuid;
use crate::AppState;

const PAGE: &str = include_str!("../assets/index.html");

/// What the page renders for a classification: the label and the
/// confidence already formatted as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentView {
    pub label: String,
    pub score: f32,
    pub confidence: String,
}

impl From<SentimentResult> for SentimentView {
    fn from(result: SentimentResult) -> Self {
        Self {
            confidence: result.confidence(),
            label: result.label,
            score: result.score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SliderConfig {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub sentiment_model: String,
    pub summarization_model: String,
    pub device: Device,
    pub do_sample: bool,
    pub min_length: SliderConfig,
    pub max_length: SliderConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn index() -> Html<&'static str> {
    Html(PAGE)
}

pub async fn config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ConfigResponse {
        sentiment_model: state.models.sentiment.clone(),
        summarization_model: state.models.summarization.clone(),
        device: state.provider.device(),
        do_sample: state.summarizer.do_sample(),
        min_length: SliderConfig {
            min: MIN_LENGTH_RANGE.0,
            max: MIN_LENGTH_RANGE.1,
            default: DEFAULT_MIN_LENGTH,
        },
        max_length: SliderConfig {
            min: MAX_LENGTH_RANGE.0,
            max: MAX_LENGTH_RANGE.1,
            default: DEFAULT_MAX_LENGTH,
        },
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let error = state.provider.failure().map(str::to_string);
    let status = if error.is_some() { "halted" } else { "ok" };
    let code = if error.is_some() { StatusCode::SERVICE_UNAVAILABLE } else { StatusCode::OK };
    let body = HealthResponse {
        status: status.to_string(),
        started_at: state.started_at,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        error,
    };
    (code, Json(body))
}

pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    async move {
        let outcome = match halted(&state) {
            Some(outcome) => outcome,
            None => state.sentiment.analyze(&request.text).await.map(SentimentView::from),
        };
        respond(outcome)
    }
    .instrument(info_span!("analyze_sentiment", %request_id))
    .await
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizationRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    async move {
        let outcome = match halted(&state) {
            Some(outcome) => outcome,
            None => match out_of_range(&request) {
                Some(message) => OperationOutcome::warning(message),
                None => {
                    state
                        .summarizer
                        .summarize(&request.text, request.min_length, request.max_length)
                        .await
                }
            },
        };
        respond(outcome)
    }
    .instrument(info_span!("summarize", %request_id))
    .await
}

/// Once a model failed to load the session is over; nothing reaches the
/// handlers any more.
fn halted<T>(state: &AppState) -> Option<OperationOutcome<T>> {
    state.provider.failure().map(|message| {
        OperationOutcome::from_error("loading models", &Error::Initialization(message.to_string()))
    })
}

/// Bounds must lie within the slider ranges, which keeps min below max.
fn out_of_range(request: &SummarizationRequest) -> Option<String> {
    let checks = [
        ("Minimum", request.min_length, MIN_LENGTH_RANGE),
        ("Maximum", request.max_length, MAX_LENGTH_RANGE),
    ];
    checks
        .into_iter()
        .find(|(_, value, (low, high))| !(*low..=*high).contains(value))
        .map(|(name, _, (low, high))| {
            format!("{} summary length must be between {} and {}.", name, low, high)
        })
}

fn respond<T: Serialize>(outcome: OperationOutcome<T>) -> Response {
    let status = match &outcome {
        OperationOutcome::Success { .. } => StatusCode::OK,
        OperationOutcome::ValidationWarning { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        OperationOutcome::InferenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        OperationOutcome::InitializationFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(outcome)).into_response()
}
