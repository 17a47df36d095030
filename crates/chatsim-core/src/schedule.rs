//! Tick-counter gates deciding which activity runs on each tick.
//!
//! The schedule is a single counter tested against one modulus per
//! activity. Gates are independent, so several activities can fire on the
//! same tick; they are reported in a fixed order and the caller applies
//! them one after another. The counter advances only after every gate for
//! the tick has been evaluated, so tick 0 fires every enabled gate.

use crate::config::ScheduleConfig;

/// One kind of simulated chat activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    /// A generated participant posts a new message.
    CreateMessage,
    /// A random message is edited or receives a reaction.
    UpdateMessage,
    /// A new participant joins.
    CreateParticipant,
    /// A random participant changes name or avatar.
    UpdateParticipant,
}

/// Evaluation order of the gates within one tick.
const GATE_ORDER: [Activity; 4] = [
    Activity::CreateMessage,
    Activity::UpdateMessage,
    Activity::CreateParticipant,
    Activity::UpdateParticipant,
];

/// Counter-driven activity schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySchedule {
    /// Next tick to evaluate (0-indexed).
    tick: u64,
    /// Cadence per activity, in ticks. 0 disables the gate.
    cadence: ScheduleConfig,
}

impl ActivitySchedule {
    /// Create a schedule starting at tick 0.
    pub const fn new(cadence: ScheduleConfig) -> Self {
        Self { tick: 0, cadence }
    }

    /// The next tick to be evaluated.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Configured tick period in milliseconds.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.cadence.tick_interval_ms
    }

    /// Cadence of `activity` in ticks (0 = disabled).
    pub const fn every(&self, activity: Activity) -> u64 {
        match activity {
            Activity::CreateMessage => self.cadence.create_message_every,
            Activity::UpdateMessage => self.cadence.update_message_every,
            Activity::CreateParticipant => self.cadence.create_participant_every,
            Activity::UpdateParticipant => self.cadence.update_participant_every,
        }
    }

    /// Activities whose gate fires on the current tick, in evaluation order.
    pub fn due(&self) -> Vec<Activity> {
        GATE_ORDER
            .into_iter()
            .filter(|activity| self.tick.checked_rem(self.every(*activity)) == Some(0))
            .collect()
    }

    /// Move to the next tick. Saturates at `u64::MAX`.
    pub const fn advance(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }
}
