//! Wall-clock time sources for the chat simulation.
//!
//! Every timestamp the engine writes (`created_at`, `sent_at`,
//! `updated_at`) comes from a [`TimeSource`]. Production uses
//! [`SystemTimeSource`]; tests use [`ManualTimeSource`] to pin and advance
//! time deterministically.
//!
//! All sources report Unix epoch milliseconds and never go backwards.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// A monotonically non-decreasing millisecond clock.
pub trait TimeSource: Send + Sync + Debug {
    /// Current time in Unix epoch milliseconds.
    fn now_ms(&self) -> u64;
}

/// Clock backed by the system wall clock.
///
/// The last observed reading is remembered so that a wall-clock step
/// backwards (NTP adjustment) never produces a smaller timestamp.
#[derive(Debug, Default)]
pub struct SystemTimeSource {
    /// Largest reading handed out so far.
    last: AtomicU64,
}

impl SystemTimeSource {
    /// Create a new system clock.
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        // Negative epoch readings only happen on badly misconfigured hosts; treat as 0.
        let raw = u64::try_from(Utc::now().timestamp_millis().max(0)).unwrap_or(0);
        let previous = self.last.fetch_max(raw, Ordering::AcqRel);
        previous.max(raw)
    }
}

/// Manually driven clock for tests and deterministic runs.
///
/// Cloning shares the underlying counter, so a test can keep one handle
/// and move time forward while the engine holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    /// Current reading in milliseconds.
    now: Arc<AtomicU64>,
}

impl ManualTimeSource {
    /// Create a clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Move the clock forward by `delta_ms`, saturating at `u64::MAX`.
    pub fn advance(&self, delta_ms: u64) -> u64 {
        let previous = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(delta_ms))
            })
            .unwrap_or_else(|current| current);
        previous.saturating_add(delta_ms)
    }

    /// Set the clock to `ms` unless that would move it backwards.
    pub fn set(&self, ms: u64) {
        self.now.fetch_max(ms, Ordering::AcqRel);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}
