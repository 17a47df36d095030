//! Shared type definitions for the Chatsim chat simulation.
//!
//! This crate is the single source of truth for the entities kept by the
//! simulation engine and for the response shapes served over the chat API.
//! Types flow downstream to `TypeScript` via `ts-rs` for demo clients.
//!
//! # Modules
//!
//! - [`ids`] -- String-backed identifier newtypes for every entity kind
//! - [`structs`] -- Stored entities (participants, messages, attachments, reactions)
//! - [`views`] -- Response projections (resolved messages, session info)

pub mod ids;
pub mod structs;
pub mod views;

// Re-export all public types at crate root for convenience.
pub use ids::{AttachmentId, MAIN_PARTICIPANT_ID, MessageId, ParticipantId, ReactionId, SessionId};
pub use structs::{Attachment, AttachmentKind, Message, Participant, Reaction};
pub use views::{API_VERSION, QuotedMessage, ResolvedMessage, SchedulerStatus, SessionInfo};
