//! Chat HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the Axum
//! server until the caller's shutdown future resolves.
//!
//! The server does not install its own signal handler and is not spawned
//! in the background. The caller owns the shutdown trigger: the binary
//! passes a Ctrl-C future and stops the activity loop only after
//! `start_server` returns. In-flight requests drain before it returns, so
//! no handler is still holding the engine lock when the loop is stopped.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use chatsim_core::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Start the chat HTTP server.
///
/// Binds to the configured address, builds the router, and serves
/// requests until `shutdown` resolves. Returns `Ok(())` on clean
/// shutdown, or an error if binding or serving fails.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Chat server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("Chat server shut down");
    Ok(())
}

/// Errors that can occur when starting or running the chat server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
