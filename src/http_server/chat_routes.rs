//! Chat HTTP Routes
//!
//! `POST /chat_with_gemini` forwards `{"message": ...}` to the completion
//! provider and answers `{"response": ...}`.
//!
//! An optional bearer token is verified when a verifier is configured. The
//! outcome is logged only; it never changes the response.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;

/// Chat routes with shared state
pub fn chat_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat_with_gemini", post(chat_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Chat handler
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ChatResponse>> {
    let request_id = Uuid::new_v4().to_string();

    if let Some(token) = bearer_token(&headers) {
        observe_token(&state, &request_id, token).await;
    }

    let message = match extract_message(&body) {
        Some(message) => message,
        None => {
            log_event_with_fields(Event::ChatRejected, &[("request_id", &request_id)]);
            return Err(ApiError::MissingMessage);
        }
    };

    match state.assistant.complete(&message).await {
        Ok(text) => {
            let chars = text.chars().count().to_string();
            log_event_with_fields(
                Event::ChatCompleted,
                &[("request_id", &request_id), ("chars", &chars)],
            );
            Ok(Json(ChatResponse { response: text }))
        }
        Err(e) => {
            let detail = e.to_string();
            log_event_with_fields(
                Event::ChatFailed,
                &[("request_id", &request_id), ("kind", e.kind()), ("detail", &detail)],
            );
            Err(ApiError::Upstream(e))
        }
    }
}

/// Pull a non-empty string `message` out of a JSON body
fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Bearer token from the Authorization header, if any
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn observe_token(state: &AppState, request_id: &str, token: &str) {
    let Some(verifier) = &state.verifier else {
        return;
    };

    match verifier.verify(token).await {
        Ok(subject) => log_event_with_fields(
            Event::TokenVerified,
            &[("request_id", request_id), ("subject", &subject)],
        ),
        Err(e) => {
            let reason = e.to_string();
            let fault = if e.is_client_error() { "token" } else { "verifier" };
            log_event_with_fields(
                Event::TokenRejected,
                &[("request_id", request_id), ("fault", fault), ("reason", &reason)],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(br#"{"message": "Do you sell boots?"}"#).as_deref(),
            Some("Do you sell boots?")
        );
        assert_eq!(extract_message(br#"{"message": ""}"#), None);
        assert_eq!(extract_message(br#"{"message": 42}"#), None);
        assert_eq!(extract_message(br#"{"text": "hi"}"#), None);
        assert_eq!(extract_message(b"not json"), None);
        assert_eq!(extract_message(b""), None);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
