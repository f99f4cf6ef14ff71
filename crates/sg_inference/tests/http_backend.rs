use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use sg_core::OperationOutcome;
use sg_inference::prelude::*;
use sg_inference::{BackendKind, DevicePreference};

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

async fn infer(
    State(seen): State<Seen>,
    Path(model): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.lock().unwrap().push((model.clone(), body.clone()));
    match model.as_str() {
        "sst2" => (
            StatusCode::OK,
            Json(json!([[{"label": "POSITIVE", "score": 0.9987}, {"label": "NEGATIVE", "score": 0.0013}]])),
        ),
        "org/bart" => (
            StatusCode::OK,
            Json(json!([{"summary_text": "A short generated summary."}])),
        ),
        "flaky" => {
            let inputs = body["inputs"].as_str().unwrap_or_default();
            if inputs == "warmup" {
                (StatusCode::OK, Json(json!([[{"label": "NEGATIVE", "score": 0.6}]])))
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "CUDA out of memory"})))
            }
        }
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": format!("Model {} is currently loading", model)})),
        ),
    }
}

async fn spawn_server() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/models/*model", post(infer))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn config(addr: SocketAddr, sentiment: &str, summarization: &str) -> InferenceConfig {
    InferenceConfig {
        backend: BackendKind::Http,
        base_url: format!("http://{}", addr),
        api_token: Some("test-token".to_string()),
        sentiment_model: sentiment.to_string(),
        summarization_model: summarization.to_string(),
        device: DevicePreference::Cpu,
        do_sample: true,
        warmup: true,
    }
}

#[tokio::test]
async fn test_http_pipelines() {
    let (addr, seen) = spawn_server().await;
    let config = config(addr, "sst2", "org/bart");
    let provider = Arc::new(ModelProvider::from_config(&config).unwrap());
    provider.preload().await.unwrap();

    let sentiment = SentimentHandler::new(provider.clone());
    match sentiment.analyze("I love this product, it works great!").await {
        OperationOutcome::Success { result } => {
            assert_eq!(result.label, "POSITIVE");
            assert_eq!(result.confidence(), "99.87%");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let summarizer = SummarizationHandler::new(provider.clone(), config.do_sample);
    let outcome = summarizer.summarize("A long article body.", 50, 150).await;
    assert_eq!(
        outcome,
        OperationOutcome::success(SummaryResult { summary_text: "A short generated summary.".to_string() })
    );

    let seen = seen.lock().unwrap();
    let (model, body) = seen.last().unwrap();
    assert_eq!(model, "org/bart");
    assert_eq!(body["inputs"], "A long article body.");
    assert_eq!(body["parameters"]["min_length"], 50);
    assert_eq!(body["parameters"]["max_length"], 150);
    assert_eq!(body["parameters"]["do_sample"], true);
    assert_eq!(body["options"]["use_gpu"], false);
    assert_eq!(body["options"]["use_cache"], false);
    // two warm-up calls plus one call per handler
    assert_eq!(seen.len(), 4);
}

#[tokio::test]
async fn test_unavailable_model_halts_session() {
    let (addr, _seen) = spawn_server().await;
    let provider = Arc::new(ModelProvider::from_config(&config(addr, "missing", "org/bart")).unwrap());

    let err = provider.preload().await.unwrap_err();
    assert!(err.is_initialization());
    assert!(err.to_string().contains("currently loading"));

    let summarizer = SummarizationHandler::new(provider, true);
    assert!(summarizer.summarize("Some text.", 50, 150).await.is_fatal());
}

#[tokio::test]
async fn test_inference_error_is_reported() {
    let (addr, _seen) = spawn_server().await;
    let provider = Arc::new(ModelProvider::from_config(&config(addr, "flaky", "org/bart")).unwrap());
    let sentiment = SentimentHandler::new(provider.clone());

    let outcome = sentiment.analyze("anything at all").await;
    match outcome {
        OperationOutcome::InferenceFailure { message } => {
            assert!(message.starts_with("Error analyzing sentiment"));
            assert!(message.contains("CUDA out of memory"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!provider.is_halted());
}
