//! Error types for the chat server binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the chat server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: chatsim_core::config::ConfigError,
    },

    /// The log filter could not be built.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: chatsim_api::ServerError,
    },
}
