//! Simulation engine for the Chatsim chat session.
//!
//! This crate owns all authoritative state of a simulated chat: the
//! participants, the messages, and the tick-driven activity that mutates
//! them to emulate a live conversation.
//!
//! # Modules
//!
//! - [`clock`] -- [`TimeSource`] trait with a system and a manual clock.
//! - [`config`] -- Configuration loading from `chatsim-config.yaml` into
//!   strongly-typed structs.
//! - [`content`] -- [`ContentSource`] trait and the built-in [`LoremContent`]
//!   fake data provider.
//! - [`engine`] -- [`ChatEngine`], the single object holding the store and
//!   the randomness, time and content sources.
//! - [`error`] -- Engine error taxonomy.
//! - [`mutation`] -- Operations that create or alter entities.
//! - [`query`] -- Read-only feeds over the store with reply resolution.
//! - [`runner`] -- [`Scheduler`], the async start/stop tick loop.
//! - [`schedule`] -- Tick-counter gates deciding which activity runs.
//! - [`store`] -- [`EntityStore`], the append-only entity collections.
//!
//! [`TimeSource`]: clock::TimeSource
//! [`ContentSource`]: content::ContentSource
//! [`LoremContent`]: content::LoremContent
//! [`ChatEngine`]: engine::ChatEngine
//! [`Scheduler`]: runner::Scheduler
//! [`EntityStore`]: store::EntityStore

pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod mutation;
pub mod query;
pub mod runner;
pub mod schedule;
pub mod store;

pub use engine::{ChatEngine, SharedEngine};
pub use error::EngineError;
pub use mutation::AuthorPolicy;
pub use runner::Scheduler;
