//! HTTP gateway built on axum.
//!
//! Routes:
//! - `POST /format`: run the provider chain and parse the result
//! - `POST /parse`: parse any canonical answer text
//! - `GET /health`: liveness plus the tier order

use crate::parser::{ParsedAnswer, parse};
use crate::service::{FormatRequest, FormatResponse, Formatter};
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared formatter reference for axum handlers.
pub type SharedFormatter = Arc<Formatter>;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// Build the axum router.
pub fn router(formatter: SharedFormatter) -> Router {
    Router::new()
        .route("/format", post(format_handler))
        .route("/parse", post(parse_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(formatter)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(formatter: SharedFormatter, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Gateway listening");
    axum::serve(listener, router(formatter))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}

async fn format_handler(
    State(formatter): State<SharedFormatter>,
    Json(request): Json<FormatRequest>,
) -> Json<FormatResponse> {
    Json(formatter.format(request).await)
}

async fn parse_handler(Json(request): Json<ParseRequest>) -> Json<ParsedAnswer> {
    Json(parse(&request.text))
}

async fn health_handler(State(formatter): State<SharedFormatter>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "backends": formatter.chain().tier_names(),
    }))
}
