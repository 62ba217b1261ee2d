//! newsbot HTTP API
//!
//! Axum-based HTTP server that receives the chat platform's skill webhook.
//!
//! Each endpoint has a thin axum handler that delegates to an inner function;
//! the inner functions are directly testable without axum dispatch machinery.
//!
//! Endpoints:
//! - POST /api/searchNews: skill webhook, replies with a simpleText envelope
//! - GET  /health: store health with PostgreSQL / pgvector versions
//! - GET  /version: server version info

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use newsbot_core::models::{ReplyEnvelope, SkillRequest};
use newsbot_core::store::ArticleStore;
use newsbot_core::NewsbotConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::pipeline::Pipeline;
use crate::subsystems::respond;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pipeline: Arc<Pipeline>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/api/searchNews", post(search_news_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    pipeline: Arc<Pipeline>,
    config: &NewsbotConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { pipeline });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("newsbot HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

fn envelope_json(envelope: &ReplyEnvelope) -> serde_json::Value {
    serde_json::to_value(envelope).unwrap_or_else(|_| serde_json::json!({}))
}

/// Inner webhook: validates the payload and runs the pipeline.
///
/// The body is parsed here rather than by an extractor, so invalid JSON or a
/// missing content type still gets an envelope. 200 with the reply envelope,
/// 400 for a malformed request, 500 with an apology envelope when an aborting
/// stage fails.
pub async fn search_news_inner(
    pipeline: &Pipeline,
    body: &[u8],
) -> (StatusCode, serde_json::Value) {
    let request: SkillRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed skill request");
            return (
                StatusCode::BAD_REQUEST,
                envelope_json(&respond::malformed_request_reply()),
            );
        }
    };

    let start = Instant::now();
    let outcome = pipeline.handle(&request).await;
    let took_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(envelope) => {
            tracing::info!(took_ms, "Skill request answered");
            (StatusCode::OK, envelope_json(&envelope))
        }
        Err(e) if e.is_client_error() => {
            tracing::warn!(error = %e, "Rejected malformed skill request");
            (
                StatusCode::BAD_REQUEST,
                envelope_json(&respond::malformed_request_reply()),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, took_ms, "News search pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                envelope_json(&respond::apology_reply()),
            )
        }
    }
}

/// Inner health check: asks the store for its versions.
pub async fn health_inner(store: &dyn ArticleStore) -> (StatusCode, serde_json::Value) {
    match store.health().await {
        Ok(health) => (
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "postgresql": health.postgresql,
                "pgvector": health.pgvector,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "unhealthy",
                "error": e.to_string(),
            }),
        ),
    }
}

/// Inner version: returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "skill_response_version": newsbot_core::models::skill::SKILL_RESPONSE_VERSION,
    })
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn search_news_handler(
    State(state): State<Arc<HttpState>>,
    body: Bytes,
) -> impl IntoResponse {
    let (status, body) = search_news_inner(&state.pipeline, &body).await;
    (status, Json(body))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(state.pipeline.store()).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

// ============================================================================
// Unit Tests (inner functions called directly)
// ============================================================================
