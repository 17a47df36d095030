//! Axum router construction for the chat API.
//!
//! All endpoints are nested under `/api` with CORS middleware enabled for
//! cross-origin demo clients.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;

/// Build the complete Axum router for the chat server.
///
/// The router includes:
/// - `GET /api/info` -- session id and API version
/// - `GET /api/messages/all` -- every message
/// - `GET /api/messages/latest` -- newest page
/// - `GET /api/messages/older/{id}` -- page before `id`
/// - `GET /api/messages/updates/{t}` -- messages changed since `t`
/// - `POST /api/messages/new` -- post as the main user (trailing slash allowed)
/// - `GET /api/participants/all` -- every participant
/// - `GET /api/participants/updates/{t}` -- participants changed since `t`
/// - `POST /api/scheduler/start`, `POST /api/scheduler/stop`,
///   `GET /api/scheduler/status` -- operator controls
///
/// Unknown paths under `/api` return a JSON `404`; anything else returns
/// a plain-text banner.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/info", get(handlers::get_info))
        // Messages
        .route("/messages/all", get(handlers::list_all_messages))
        .route("/messages/latest", get(handlers::list_latest_messages))
        .route("/messages/older/{id}", get(handlers::list_older_messages))
        .route(
            "/messages/updates/{timestamp}",
            get(handlers::list_message_updates),
        )
        .route("/messages/new", post(handlers::post_message))
        .route("/messages/new/", post(handlers::post_message))
        // Participants
        .route("/participants/all", get(handlers::list_participants))
        .route(
            "/participants/updates/{timestamp}",
            get(handlers::list_participant_updates),
        )
        // Operator
        .route("/scheduler/start", post(operator::start))
        .route("/scheduler/stop", post(operator::stop))
        .route("/scheduler/status", get(operator::status))
        .fallback(handlers::api_not_found);

    Router::new()
        .nest("/api", api)
        .fallback(handlers::fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
