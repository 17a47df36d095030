//! Error types for engine operations.
//!
//! The engine has no fatal errors. Requests that fail validation are
//! reported as [`EngineError::EmptyText`] and leave the store untouched;
//! [`EngineError::Store`] only surfaces if an operation would break a
//! store invariant, which the mutation operations never construct.

use crate::store::StoreError;

/// Errors returned by engine write operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Posted message text was empty.
    #[error("message text must be a non-empty string")]
    EmptyText,

    /// An insertion was refused by the entity store.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}
