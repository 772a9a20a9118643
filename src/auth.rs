//! API secret generation and the request authentication gate.
//!
//! One random secret is generated at process start, held only in memory, and
//! required on every request via the `X-API-KEY` header — including, per the
//! current contract, the endpoint that serves the key itself. A restart
//! invalidates all previously distributed keys.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::AppState;

/// Header carrying the API secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Generate a fresh 128-bit secret from the OS CSPRNG, as 32 hex characters.
pub fn generate_secret() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Middleware run before every route. On a missing or mismatched key the
/// request short-circuits with 401 — no handler logic runs and no event-log
/// line is written for the rejection.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.api_secret.as_ref()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_32_hex_chars() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 32);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn secrets_are_unique_per_generation() {
        assert_ne!(generate_secret(), generate_secret());
    }
}
