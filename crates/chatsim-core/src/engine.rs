//! The chat engine: one explicitly constructed object owning all state.
//!
//! [`ChatEngine`] bundles the [`EntityStore`] with the sources it needs to
//! evolve it: a seeded RNG, a [`TimeSource`] and a [`ContentSource`].
//! Mutation operations live in [`crate::mutation`] and read feeds in
//! [`crate::query`]; both are `impl ChatEngine` blocks over the same state.
//!
//! Every engine operation is synchronous and runs to completion. Callers
//! that share the engine across tasks wrap it in [`SharedEngine`], whose
//! single mutex covers each whole operation.

use std::sync::Arc;

use chatsim_types::{API_VERSION, Participant, ParticipantId, SessionId, SessionInfo};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::TimeSource;
use crate::config::{ChatsimConfig, ConfigError, EngineConfig, ProbabilityConfig};
use crate::content::{ContentSource, LoremContent};
use crate::mutation::AuthorPolicy;
use crate::schedule::{Activity, ActivitySchedule};
use crate::store::EntityStore;

/// Engine shared between the activity loop and request handlers.
pub type SharedEngine = Arc<Mutex<ChatEngine>>;

/// Display name of the main user.
const MAIN_DISPLAY_NAME: &str = "You";

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick that was evaluated.
    pub tick: u64,
    /// Activities whose gate fired, in the order they were applied.
    pub fired: Vec<Activity>,
    /// Activities that fired but found no eligible entity.
    pub skipped: Vec<Activity>,
}

/// The simulation engine.
#[derive(Debug)]
pub struct ChatEngine {
    /// Identifier of this engine lifetime.
    pub(crate) session_id: SessionId,
    /// Authoritative entity collections.
    pub(crate) store: EntityStore,
    /// Seeded randomness for every selection and threshold.
    pub(crate) rng: StdRng,
    /// Wall-clock source for timestamps.
    pub(crate) clock: Arc<dyn TimeSource>,
    /// Fake content provider.
    pub(crate) content: Arc<dyn ContentSource>,
    /// Seeding and page sizes.
    pub(crate) settings: EngineConfig,
    /// Branching thresholds.
    pub(crate) odds: ProbabilityConfig,
    /// Tick-counter activity gates.
    pub(crate) schedule: ActivitySchedule,
}

impl ChatEngine {
    /// Create an engine with the built-in [`LoremContent`] provider.
    ///
    /// The store starts with only the main user; call [`setup`](Self::setup)
    /// to seed generated participants and messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// [`ChatsimConfig::validate`].
    pub fn new(
        config: &ChatsimConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        Self::with_content(config, clock, Arc::new(LoremContent))
    }

    /// Create an engine with a custom content provider.
    ///
    /// The configuration is validated first, so every probability the
    /// engine holds lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// [`ChatsimConfig::validate`].
    pub fn with_content(
        config: &ChatsimConfig,
        clock: Arc<dyn TimeSource>,
        content: Arc<dyn ContentSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = config
            .engine
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let now = clock.now_ms();
        let main = Participant {
            id: ParticipantId::main(),
            display_name: MAIN_DISPLAY_NAME.to_owned(),
            avatar_url: content.avatar_url(&mut rng),
            bio: content.bio(&mut rng),
            email: content.email(&mut rng),
            job_title: content.job_title(&mut rng),
            created_at: now,
            updated_at: now,
        };

        let session_id = SessionId::new();
        info!(session_id = %session_id, seed = ?config.engine.seed, "Chat engine created");

        Ok(Self {
            session_id,
            store: EntityStore::new(main),
            rng,
            clock,
            content,
            settings: config.engine.clone(),
            odds: config.probabilities.clone(),
            schedule: ActivitySchedule::new(config.schedule.clone()),
        })
    }

    /// Wrap the engine for sharing across tasks.
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// Seed the configured number of participants, then messages.
    ///
    /// The i-th seed message is created with an `i` millisecond delay so
    /// seed messages have strictly increasing `sent_at`.
    pub fn setup(&mut self) {
        for _ in 0..self.settings.seed_participants {
            let _ = self.create_participant();
        }
        for delay in 0..self.settings.seed_messages {
            let _ = self.create_message(AuthorPolicy::RandomGenerated, u64::from(delay));
        }
        info!(
            participants = self.store.participant_count(),
            messages = self.store.message_count(),
            "Chat engine seeded"
        );
    }

    /// Session identifier and API version.
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id.clone(),
            api_version: API_VERSION,
        }
    }

    /// Read-only access to the entity store.
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The activity schedule.
    pub const fn schedule(&self) -> &ActivitySchedule {
        &self.schedule
    }

    /// Current time from the engine clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Evaluate one tick: apply every due activity in order, then advance
    /// the counter.
    pub fn tick(&mut self) -> TickSummary {
        let tick = self.schedule.tick();
        let fired = self.schedule.due();
        let mut skipped = Vec::new();

        for activity in &fired {
            let applied = self.apply(*activity);
            if !applied {
                warn!(tick, activity = ?activity, "No eligible entity, activity skipped");
                skipped.push(*activity);
            }
        }

        let _ = self.schedule.advance();
        if !fired.is_empty() {
            debug!(tick, fired = ?fired, "Tick applied");
        }
        TickSummary {
            tick,
            fired,
            skipped,
        }
    }

    /// Evaluate `count` ticks back to back.
    pub fn run_ticks(&mut self, count: u64) -> Vec<TickSummary> {
        (0..count).map(|_| self.tick()).collect()
    }

    /// Apply one activity. Returns `false` if it had nothing to act on.
    fn apply(&mut self, activity: Activity) -> bool {
        match activity {
            Activity::CreateMessage => self
                .create_message(AuthorPolicy::RandomGenerated, 0)
                .is_some(),
            Activity::UpdateMessage => self.update_random_message().is_some(),
            Activity::CreateParticipant => self.create_participant().is_some(),
            Activity::UpdateParticipant => self.update_random_participant().is_some(),
        }
    }
}
