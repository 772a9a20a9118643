//! HTTP handlers, router, and error mapping.
//!
//! Request flow: authentication gate → handler → memory store / event log →
//! JSON response. Validation failures map to 400, a missing log file to 404,
//! and anything unexpected on the request path propagates as 500 — request
//! handling performs no retries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::auth;
use crate::event_log::EventLog;
use crate::memory::search::{search_content, MemoryMatch};
use crate::memory::store::insert_entry;
use crate::memory::DEFAULT_CATEGORY;

/// Maximum number of raw log lines returned by `GET /logs/retrieve`.
pub const LOG_TAIL_LIMIT: usize = 100;

/// Shared state injected into every handler. Built once at startup; the
/// secret is read-only thereafter, and every store operation holds the
/// connection mutex for its full duration (non-reentrant — never nested).
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub events: Arc<EventLog>,
    pub api_secret: Arc<str>,
}

impl AppState {
    pub fn new(db: Arc<Mutex<Connection>>, events: Arc<EventLog>, api_secret: &str) -> Self {
        Self {
            db,
            events,
            api_secret: Arc::from(api_secret),
        }
    }
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Content cannot be empty")]
    EmptyContent,
    #[error("Log file not found.")]
    LogFileMissing,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::EmptyContent => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "status": "Error", "message": self.to_string() }),
            ),
            ApiError::LogFileMissing => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": self.to_string() }),
            ),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": e.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ── Request/response bodies ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddMemoryRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AddMemoryResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matches: Vec<MemoryMatch>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /memory/add
async fn add_memory(
    State(state): State<AppState>,
    Json(req): Json<AddMemoryRequest>,
) -> Result<Json<AddMemoryResponse>, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }

    let db = Arc::clone(&state.db);
    let category = req.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let content = req.content;
    let category_for_log = category.clone();

    // Sync DB work under the store lock → spawn_blocking
    tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {e}"))?;
        insert_entry(&conn, &category, &content)
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("db task panicked: {e}")))?
    .map_err(ApiError::Internal)?;

    state
        .events
        .append(
            "SUCCESS",
            &format!("Memory entry added under '{category_for_log}'"),
        )
        .map_err(ApiError::Internal)?;

    Ok(Json(AddMemoryResponse {
        status: "Success".into(),
        message: "Memory entry added.".into(),
    }))
}

/// GET /memory/search/{keyword}
async fn search_memory(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let db = Arc::clone(&state.db);

    let matches = tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {e}"))?;
        search_content(&conn, &keyword)
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("db task panicked: {e}")))?
    .map_err(ApiError::Internal)?;

    let count = matches.len();
    Ok(Json(SearchResponse { matches, count }))
}

/// GET /logs/retrieve
async fn retrieve_logs(State(state): State<AppState>) -> Result<Json<LogsResponse>, ApiError> {
    match state.events.tail(LOG_TAIL_LIMIT).map_err(ApiError::Internal)? {
        Some(logs) => {
            let count = logs.len();
            Ok(Json(LogsResponse { logs, count }))
        }
        None => Err(ApiError::LogFileMissing),
    }
}

/// GET /get_api_key
///
/// The authentication gate covers this route too, so in practice the key can
/// only be obtained out of band (it is printed to stderr at startup).
async fn get_api_key(State(state): State<AppState>) -> Json<ApiKeyResponse> {
    Json(ApiKeyResponse {
        api_key: state.api_secret.to_string(),
    })
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the full application router with the authentication gate layered
/// over every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/memory/add", post(add_memory))
        .route("/memory/search/{keyword}", get(search_memory))
        .route("/logs/retrieve", get(retrieve_logs))
        .route("/get_api_key", get(get_api_key))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .with_state(state)
}
