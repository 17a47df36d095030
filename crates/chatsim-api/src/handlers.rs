//! REST API endpoint handlers for the chat server.
//!
//! Every handler locks the shared engine for exactly one engine call.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/info` | Session id and API version |
//! | `GET` | `/api/messages/all` | Every message, resolved |
//! | `GET` | `/api/messages/latest` | Newest page of messages |
//! | `GET` | `/api/messages/older/:id` | Page of messages before `id` |
//! | `GET` | `/api/messages/updates/:t` | Messages changed at or after `t` |
//! | `POST` | `/api/messages/new` | Post a message as the main user |
//! | `GET` | `/api/participants/all` | Every participant, main user first |
//! | `GET` | `/api/participants/updates/:t` | Participants changed at or after `t` |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use chatsim_types::{MessageId, Participant, ResolvedMessage, SessionInfo};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of every response to a path outside `/api`.
pub const FALLBACK_TEXT: &str = "Dummy chat server";

// ---------------------------------------------------------------------------
// GET /api/info
// ---------------------------------------------------------------------------

/// Session id and API version.
pub async fn get_info(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    Json(state.engine.lock().await.session_info())
}

// ---------------------------------------------------------------------------
// Message feeds
// ---------------------------------------------------------------------------

/// Every message in store order.
pub async fn list_all_messages(State(state): State<Arc<AppState>>) -> Json<Vec<ResolvedMessage>> {
    Json(state.engine.lock().await.list_all_messages())
}

/// The newest page of messages.
pub async fn list_latest_messages(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ResolvedMessage>> {
    Json(state.engine.lock().await.list_latest_messages())
}

/// The page of messages preceding `id`. Empty when `id` is unknown.
pub async fn list_older_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<ResolvedMessage>> {
    let before = MessageId::from(id);
    Json(state.engine.lock().await.list_older_messages(&before))
}

/// Messages modified at or after the path timestamp.
pub async fn list_message_updates(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Json<Vec<ResolvedMessage>>, ApiError> {
    let since = parse_timestamp(&raw)?;
    Ok(Json(state.engine.lock().await.list_messages_since(since)))
}

// ---------------------------------------------------------------------------
// POST /api/messages/new
// ---------------------------------------------------------------------------

/// Post a message authored by the main user.
///
/// The body must be a JSON object whose `text` field is a non-empty
/// string. Anything else is rejected with `400` and the store is left
/// unchanged.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ResolvedMessage>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let text = extract_text(&body)?;

    let mut engine = state.engine.lock().await;
    let message = engine.add_user_message(text)?;
    let resolved = engine.resolve(&message);
    drop(engine);

    info!(message_id = %resolved.id, "Message posted");
    Ok(Json(resolved))
}

/// Pull the `text` string out of a post body.
fn extract_text(body: &Value) -> Result<&str, ApiError> {
    match body.get("text") {
        None => Err(ApiError::InvalidBody("missing field `text`".to_owned())),
        Some(value) => value
            .as_str()
            .ok_or_else(|| ApiError::InvalidBody("`text` must be a string".to_owned())),
    }
}

// ---------------------------------------------------------------------------
// Participant feeds
// ---------------------------------------------------------------------------

/// Every participant, main user first.
pub async fn list_participants(State(state): State<Arc<AppState>>) -> Json<Vec<Participant>> {
    Json(state.engine.lock().await.list_participants())
}

/// Participants modified at or after the path timestamp.
pub async fn list_participant_updates(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    let since = parse_timestamp(&raw)?;
    Ok(Json(state.engine.lock().await.list_participants_since(since)))
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

/// Unknown path under `/api`.
#[allow(clippy::unused_async)]
pub async fn api_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}

/// Any path outside `/api`.
#[allow(clippy::unused_async)]
pub async fn fallback() -> &'static str {
    FALLBACK_TEXT
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a path timestamp in milliseconds. Zero is rejected.
fn parse_timestamp(raw: &str) -> Result<u64, ApiError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ApiError::InvalidTimestamp(format!(
            "{raw}: must be greater than zero"
        ))),
        Ok(since) => Ok(since),
        Err(e) => Err(ApiError::InvalidTimestamp(format!("{raw}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_parsing() {
        assert!(matches!(parse_timestamp("1700000000000"), Ok(1_700_000_000_000)));
        assert!(matches!(parse_timestamp("0"), Err(ApiError::InvalidTimestamp(_))));
        assert!(matches!(parse_timestamp("-5"), Err(ApiError::InvalidTimestamp(_))));
        assert!(matches!(parse_timestamp("abc"), Err(ApiError::InvalidTimestamp(_))));
        assert!(matches!(parse_timestamp("12.5"), Err(ApiError::InvalidTimestamp(_))));
    }

    #[test]
    fn text_extraction() {
        let body = serde_json::json!({ "text": "hi" });
        assert!(matches!(extract_text(&body), Ok("hi")));

        let missing = serde_json::json!({ "body": "hi" });
        assert!(matches!(extract_text(&missing), Err(ApiError::InvalidBody(_))));

        let number = serde_json::json!({ "text": 42 });
        assert!(matches!(extract_text(&number), Err(ApiError::InvalidBody(_))));

        let not_object = serde_json::json!(["text"]);
        assert!(matches!(extract_text(&not_object), Err(ApiError::InvalidBody(_))));
    }
}
