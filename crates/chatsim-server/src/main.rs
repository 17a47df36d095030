//! Chat simulation server binary.
//!
//! Wires together the engine, the activity loop and the HTTP API. It
//! loads configuration, seeds the conversation, starts ticking, and serves
//! requests until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `chatsim-config.yaml` (or `CHATSIM_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the engine and seed participants and messages
//! 4. Start the activity loop
//! 5. Serve the chat API until `Ctrl-C`
//! 6. Stop the activity loop

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use chatsim_api::AppState;
use chatsim_core::ChatEngine;
use chatsim_core::clock::SystemTimeSource;
use chatsim_core::config::{ChatsimConfig, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Config file read when `CHATSIM_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "chatsim-config.yaml";

/// Application entry point for the chat server.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot
/// bind its address.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let config_path = std::env::var("CHATSIM_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = ChatsimConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging)?;
    info!(
        config_path = %config_path.display(),
        seed = ?config.engine.seed,
        tick_interval_ms = config.schedule.tick_interval_ms,
        "chatsim-server starting"
    );

    // 3. Create and seed the engine.
    let mut engine = ChatEngine::new(&config, Arc::new(SystemTimeSource::new()))?;
    engine.setup();
    let state = Arc::new(AppState::new(
        engine.into_shared(),
        config.schedule.tick_interval_ms,
    ));

    // 4. Start the activity loop.
    let _ = state.scheduler.lock().await.start();

    // 5. Serve until interrupted.
    let served =
        chatsim_api::start_server(&config.server, Arc::clone(&state), shutdown_signal()).await;

    // 6. Stop the activity loop.
    let _ = state.scheduler.lock().await.stop();
    served?;

    info!("chatsim-server stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| AppError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Resolve on `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
