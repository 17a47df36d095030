//! Background activity loop with start/stop controls.
//!
//! [`Scheduler`] owns the tokio task that ticks a [`SharedEngine`] at a
//! fixed wall-clock period. Each tick takes the engine lock for the whole
//! of [`ChatEngine::tick`](crate::ChatEngine::tick), so readers never see a
//! half-applied tick.
//!
//! Start and stop are idempotent. The first tick fires one period after
//! start, not immediately. After [`Scheduler::stop`] returns no new tick
//! begins; a tick already holding the lock runs to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chatsim_types::SchedulerStatus;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::engine::SharedEngine;

/// Shortest period the loop will tick at.
const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Handle to a live activity loop.
#[derive(Debug)]
struct Running {
    /// Checked under the engine lock before each tick.
    stop: Arc<AtomicBool>,
    /// The spawned loop.
    handle: JoinHandle<()>,
}

/// Drives periodic engine ticks on a tokio task.
#[derive(Debug)]
pub struct Scheduler {
    engine: SharedEngine,
    interval: Duration,
    running: Option<Running>,
}

impl Scheduler {
    /// Create a stopped scheduler ticking every `tick_interval_ms`.
    ///
    /// A zero period is raised to one millisecond.
    pub const fn new(engine: SharedEngine, tick_interval_ms: u64) -> Self {
        let tick_interval_ms = if tick_interval_ms < MIN_TICK_INTERVAL_MS {
            MIN_TICK_INTERVAL_MS
        } else {
            tick_interval_ms
        };
        Self {
            engine,
            interval: Duration::from_millis(tick_interval_ms),
            running: None,
        }
    }

    /// Spawn the activity loop.
    ///
    /// Returns `false` if it was already running. Must be called from
    /// within a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let stop = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.engine),
            self.interval,
            Arc::clone(&stop),
        ));
        self.running = Some(Running { stop, handle });
        info!(tick_interval_ms = self.tick_interval_ms(), "Scheduler started");
        true
    }

    /// Halt the activity loop.
    ///
    /// Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        running.stop.store(true, Ordering::Release);
        running.handle.abort();
        info!("Scheduler stopped");
        true
    }

    /// Whether the activity loop is live.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Wall-clock period between ticks in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX)
    }

    /// Running state, tick counter and period.
    pub async fn status(&self) -> SchedulerStatus {
        let tick = self.engine.lock().await.schedule().tick();
        SchedulerStatus {
            running: self.is_running(),
            tick,
            tick_interval_ms: self.tick_interval_ms(),
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.stop.store(true, Ordering::Release);
            running.handle.abort();
        }
    }
}

async fn run_loop(engine: SharedEngine, period: Duration, stop: Arc<AtomicBool>) {
    let now = Instant::now();
    let first = now.checked_add(period).unwrap_or(now);
    let mut ticker = tokio::time::interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let _ = ticker.tick().await;
        let mut guard = engine.lock().await;
        if stop.load(Ordering::Acquire) {
            break;
        }
        let summary = guard.tick();
        drop(guard);
        debug!(
            tick = summary.tick,
            fired = summary.fired.len(),
            skipped = summary.skipped.len(),
            "Scheduler tick"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::config::ChatsimConfig;
    use crate::engine::ChatEngine;

    const PERIOD_MS: u64 = 1_000;

    fn shared() -> SharedEngine {
        let mut config = ChatsimConfig::default();
        config.engine.seed = Some(11);
        let mut engine = ChatEngine::new(&config, Arc::new(ManualTimeSource::new(0))).unwrap();
        engine.setup();
        engine.into_shared()
    }

    async fn ticks(engine: &SharedEngine) -> u64 {
        engine.lock().await.schedule().tick()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let engine = shared();
        let mut scheduler = Scheduler::new(Arc::clone(&engine), PERIOD_MS);
        assert!(scheduler.start());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks(&engine).await, 0);

        tokio::time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(ticks(&engine).await, 3);
        assert!(scheduler.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_idempotent() {
        let engine = shared();
        let mut scheduler = Scheduler::new(engine, PERIOD_MS);
        assert!(!scheduler.is_running());
        assert!(!scheduler.stop());

        assert!(scheduler.start());
        assert!(!scheduler.start());
        assert!(scheduler.is_running());

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_stop() {
        let engine = shared();
        let mut scheduler = Scheduler::new(Arc::clone(&engine), PERIOD_MS);
        let _ = scheduler.start();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let _ = scheduler.stop();
        let at_stop = ticks(&engine).await;

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(ticks(&engine).await, at_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resumes_counter() {
        let engine = shared();
        let mut scheduler = Scheduler::new(Arc::clone(&engine), PERIOD_MS);
        let _ = scheduler.start();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let _ = scheduler.stop();
        assert_eq!(ticks(&engine).await, 1);

        let _ = scheduler.start();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(ticks(&engine).await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn status_reports_state() {
        let engine = shared();
        let mut scheduler = Scheduler::new(engine, PERIOD_MS);
        let status = scheduler.status().await;
        assert!(!status.running);
        assert_eq!(status.tick, 0);
        assert_eq!(status.tick_interval_ms, PERIOD_MS);

        let _ = scheduler.start();
        assert!(scheduler.status().await.running);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_raised_to_one_millisecond() {
        let engine = shared();
        let mut scheduler = Scheduler::new(Arc::clone(&engine), 0);
        assert_eq!(scheduler.tick_interval_ms(), 1);
        assert!(scheduler.start());

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(scheduler.is_running());
        assert!(ticks(&engine).await >= 4);
        assert!(scheduler.stop());
    }
}
