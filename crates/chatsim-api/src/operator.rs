//! Operator REST API handlers for controlling the activity loop.
//!
//! These endpoints are separate from the chat feeds. They let an operator
//! freeze the conversation (for example while a client is being debugged)
//! and resume it later without losing state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/scheduler/start` | Start the activity loop |
//! | `POST` | `/api/scheduler/stop` | Stop the activity loop |
//! | `GET` | `/api/scheduler/status` | Running flag, tick counter, period |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chatsim_types::SchedulerStatus;

use crate::state::AppState;

/// Response body for the start and stop endpoints.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct OperatorResponse {
    /// Whether the call changed the scheduler state.
    pub ok: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Scheduler state after the call.
    pub status: SchedulerStatus,
}

// ---------------------------------------------------------------------------
// POST /api/scheduler/start
// ---------------------------------------------------------------------------

/// Start the activity loop. A no-op if it is already running.
pub async fn start(State(state): State<Arc<AppState>>) -> Json<OperatorResponse> {
    let mut scheduler = state.scheduler.lock().await;
    let ok = scheduler.start();
    let status = scheduler.status().await;
    drop(scheduler);

    let message = if ok {
        "Scheduler started"
    } else {
        "Scheduler already running"
    };
    Json(OperatorResponse {
        ok,
        message: message.to_owned(),
        status,
    })
}

// ---------------------------------------------------------------------------
// POST /api/scheduler/stop
// ---------------------------------------------------------------------------

/// Stop the activity loop. A no-op if it is not running.
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<OperatorResponse> {
    let mut scheduler = state.scheduler.lock().await;
    let ok = scheduler.stop();
    let status = scheduler.status().await;
    drop(scheduler);

    let message = if ok {
        "Scheduler stopped"
    } else {
        "Scheduler not running"
    };
    Json(OperatorResponse {
        ok,
        message: message.to_owned(),
        status,
    })
}

// ---------------------------------------------------------------------------
// GET /api/scheduler/status
// ---------------------------------------------------------------------------

/// Current scheduler state.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    Json(state.scheduler.lock().await.status().await)
}
