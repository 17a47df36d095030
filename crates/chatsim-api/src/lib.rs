//! Chat API server for the Chatsim chat simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Message feeds** (`/api/messages/...`) for full, latest, older-page
//!   and changed-since reads, plus the single write endpoint for posting
//!   as the main user
//! - **Participant feeds** (`/api/participants/...`) for full and
//!   changed-since reads
//! - **Session info** (`/api/info`)
//! - **Operator endpoints** (`/api/scheduler/...`) to start, stop and
//!   inspect the activity loop
//!
//! # Architecture
//!
//! Handlers hold the [`SharedEngine`](chatsim_core::SharedEngine) lock for
//! the duration of one engine call, so every response is built from a
//! consistent snapshot and never observes a half-applied tick.

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
