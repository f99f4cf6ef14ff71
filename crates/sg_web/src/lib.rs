use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::{AppState, ModelNames};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/config", get(handlers::config))
        .route("/api/health", get(handlers::health))
        .route("/api/sentiment", post(handlers::analyze_sentiment))
        .route("/api/summarize", post(handlers::summarize))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serve the page until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> sg_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("📚 Study Genie listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

