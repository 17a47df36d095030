//! Shared application state for the chat API.
//!
//! [`AppState`] pairs the engine with the scheduler that drives it. The
//! engine lock is taken per request; the scheduler lock only by the
//! operator endpoints.

use chatsim_core::{Scheduler, SharedEngine};
use tokio::sync::Mutex;

/// State shared by every handler.
#[derive(Debug)]
pub struct AppState {
    /// The simulation engine.
    pub engine: SharedEngine,
    /// The activity loop driving `engine`.
    pub scheduler: Mutex<Scheduler>,
}

impl AppState {
    /// Create state with a stopped scheduler ticking every
    /// `tick_interval_ms`.
    pub fn new(engine: SharedEngine, tick_interval_ms: u64) -> Self {
        let scheduler = Scheduler::new(SharedEngine::clone(&engine), tick_interval_ms);
        Self {
            engine,
            scheduler: Mutex::new(scheduler),
        }
    }
}
