//! HTTP API for the quotes scraper.
//!
//! Each request to `/quotes` runs one fresh fetch-and-extract pass. Nothing
//! is cached between requests, and failures become a 500 with a
//! `{"detail": ...}` body only here at the boundary.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use quotes_acquire::{AcquireError, QUOTES_URL};
use quotes_model::Quote;
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Shared state passed to all handlers via axum `State`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Page the `/quotes` route scrapes.
    pub source_url: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            source_url: QUOTES_URL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        tracing::error!(error = %detail, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { detail })).into_response()
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/quotes", get(get_quotes))
        .route("/:name", get(greet))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Quotes API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_quotes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Quote>>, ApiError> {
    let quotes = quotes_acquire::scrape_quotes_from(&state.source_url).await?;
    Ok(Json(quotes))
}

async fn greet(Path(name): Path<String>) -> Json<Value> {
    Json(json!({ "message": format!("Hello {name}") }))
}
