//! Mutation operations: everything that creates or alters entities.
//!
//! These are invoked by the activity schedule on each tick and, for
//! [`ChatEngine::add_user_message`], directly by the write path. Random
//! selections over an empty collection degrade to a no-op that returns
//! `None`; only user input is ever rejected.
//!
//! All randomness goes through the engine's seeded RNG and every threshold
//! comes from [`ProbabilityConfig`](crate::config::ProbabilityConfig).

use chatsim_types::{
    Attachment, AttachmentId, AttachmentKind, Message, MessageId, Participant, ParticipantId,
    Reaction, ReactionId,
};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::engine::ChatEngine;
use crate::error::EngineError;

/// Image sizes a generated attachment can take, chosen uniformly.
const ATTACHMENT_SIZES: [(u32, u32); 4] = [(720, 480), (640, 120), (1280, 360), (320, 320)];

/// Fallback size if the size table were ever empty.
const DEFAULT_ATTACHMENT_SIZE: (u32, u32) = (320, 320);

/// How the author of a new message is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorPolicy {
    /// Uniformly random among generated (non-main) participants.
    RandomGenerated,
    /// The main user.
    Main,
}

impl ChatEngine {
    /// Generate a participant and append it to the store.
    pub fn create_participant(&mut self) -> Option<ParticipantId> {
        let now = self.clock.now_ms();
        let participant = Participant {
            id: ParticipantId::new(),
            display_name: self.content.full_name(&mut self.rng),
            avatar_url: self.content.avatar_url(&mut self.rng),
            bio: self.content.bio(&mut self.rng),
            email: self.content.email(&mut self.rng),
            job_title: self.content.job_title(&mut self.rng),
            created_at: now,
            updated_at: now,
        };
        let id = participant.id.clone();

        match self.store.push_participant(participant) {
            Ok(()) => {
                debug!(participant_id = %id, "Participant created");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "Participant creation refused by store");
                None
            }
        }
    }

    /// Generate a message and append it to the store.
    ///
    /// `sent_at` is the current time plus `delay_ms`, clamped so it never
    /// precedes the newest stored message. Returns `None` without touching
    /// the store when no eligible author exists.
    pub fn create_message(&mut self, policy: AuthorPolicy, delay_ms: u64) -> Option<MessageId> {
        let author_id = match policy {
            AuthorPolicy::Main => self.store.main_participant().id.clone(),
            AuthorPolicy::RandomGenerated => {
                let authors = self.store.generated_participants();
                authors.choose(&mut self.rng)?.id.clone()
            }
        };
        let text = self.content.sentence(&mut self.rng);
        let attachment_odds = self.odds.attachment;
        let reply_odds = self.odds.reply;

        match self.compose_message(author_id, text, attachment_odds, reply_odds, delay_ms) {
            Ok(message) => {
                debug!(
                    message_id = %message.id,
                    author_id = %message.author_id,
                    reply_to = ?message.reply_to_id,
                    attachments = message.attachments.len(),
                    "Message created"
                );
                Some(message.id)
            }
            Err(e) => {
                warn!(error = %e, "Message creation refused by store");
                None
            }
        }
    }

    /// Post a message as the main user.
    ///
    /// This is the only externally writable operation. Empty text is
    /// rejected and leaves the store unchanged.
    pub fn add_user_message(&mut self, text: &str) -> Result<Message, EngineError> {
        if text.is_empty() {
            return Err(EngineError::EmptyText);
        }
        let author_id = self.store.main_participant().id.clone();
        let attachment_odds = self.odds.user_attachment;
        let message = self.compose_message(author_id, text.to_owned(), attachment_odds, 0.0, 0)?;
        debug!(message_id = %message.id, "User message posted");
        Ok(message)
    }

    /// Edit a random message or add a reaction to it.
    ///
    /// Once a message holds `max_reactions` reactions it only receives
    /// text edits. Returns `None` when the store holds no messages.
    pub fn update_random_message(&mut self) -> Option<MessageId> {
        let count = self.store.message_count();
        if count == 0 {
            return None;
        }
        let position = self.rng.random_range(0..count);
        let wants_edit = self.rng.random_bool(self.odds.text_edit);
        let reaction_count = self.store.messages().get(position)?.reactions.len();
        let edit = wants_edit || reaction_count >= self.odds.max_reactions;

        let new_text = edit.then(|| self.content.sentence(&mut self.rng));
        let reaction = if edit {
            None
        } else {
            Some(self.random_reaction())
        };
        let now = self.clock.now_ms();

        let message = self.store.message_at_mut(position)?;
        if let Some(text) = new_text {
            message.text = text;
        }
        if let Some(reaction) = reaction {
            message.reactions.push(reaction);
        }
        message.touch(now);

        debug!(message_id = %message.id, edit, "Message updated");
        Some(message.id.clone())
    }

    /// Change a random generated participant's display name or avatar.
    ///
    /// The main user is never selected. Returns `None` when no generated
    /// participant exists.
    pub fn update_random_participant(&mut self) -> Option<ParticipantId> {
        let count = self.store.generated_participants().len();
        if count == 0 {
            return None;
        }
        let position = self.rng.random_range(0..count);
        let rename = self.rng.random_bool(self.odds.display_name_change);
        let value = if rename {
            self.content.full_name(&mut self.rng)
        } else {
            self.content.avatar_url(&mut self.rng)
        };
        let now = self.clock.now_ms();

        let participant = self.store.generated_participant_mut(position)?;
        if rename {
            participant.display_name = value;
        } else {
            participant.avatar_url = value;
        }
        participant.touch(now);

        debug!(participant_id = %participant.id, rename, "Participant updated");
        Some(participant.id.clone())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Build a message with the given author and text and append it.
    fn compose_message(
        &mut self,
        author_id: ParticipantId,
        text: String,
        attachment_odds: f64,
        reply_odds: f64,
        delay_ms: u64,
    ) -> Result<Message, EngineError> {
        let requested = self.clock.now_ms().saturating_add(delay_ms);
        let sent_at = self
            .store
            .latest_sent_at()
            .map_or(requested, |latest| latest.max(requested));

        let mut attachments = Vec::new();
        if self.rng.random_bool(attachment_odds) {
            attachments.push(self.random_attachment());
        }

        let reply_to_id = if self.rng.random_bool(reply_odds) {
            self.store
                .messages()
                .choose(&mut self.rng)
                .map(|target| target.id.clone())
        } else {
            None
        };

        let message = Message {
            id: MessageId::new(),
            author_id,
            text,
            attachments,
            reactions: Vec::new(),
            reply_to_id,
            sent_at,
            updated_at: sent_at,
        };
        self.store.push_message(message.clone())?;
        Ok(message)
    }

    /// Generate an image attachment of a random size.
    fn random_attachment(&mut self) -> Attachment {
        let (width, height) = ATTACHMENT_SIZES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(DEFAULT_ATTACHMENT_SIZE);
        Attachment {
            id: AttachmentId::new(),
            kind: AttachmentKind::Image,
            url: self.content.image_url(&mut self.rng, width, height),
            width,
            height,
        }
    }

    /// Generate a reaction from a random generated participant.
    ///
    /// Falls back to the main user when no generated participant exists.
    fn random_reaction(&mut self) -> Reaction {
        let reactor_id = self
            .store
            .generated_participants()
            .choose(&mut self.rng)
            .map_or_else(
                || self.store.main_participant().id.clone(),
                |p| p.id.clone(),
            );
        Reaction {
            id: ReactionId::new(),
            value: self.content.emoji(&mut self.rng),
            reactor_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::config::ChatsimConfig;

    fn engine_with(edit: fn(&mut ChatsimConfig)) -> (ChatEngine, ManualTimeSource) {
        let mut config = ChatsimConfig::default();
        config.engine.seed = Some(9);
        edit(&mut config);
        let clock = ManualTimeSource::new(5_000);
        let engine = ChatEngine::new(&config, Arc::new(clock.clone())).unwrap();
        (engine, clock)
    }

    fn seeded() -> (ChatEngine, ManualTimeSource) {
        let (mut engine, clock) = engine_with(|_| {});
        engine.setup();
        (engine, clock)
    }

    #[test]
    fn create_participant_appends() {
        let (mut engine, _) = engine_with(|_| {});
        let id = engine.create_participant().unwrap();
        let stored = engine.store().generated_participants().first().unwrap();
        assert_eq!(stored.id, id);
        assert!(!stored.display_name.is_empty());
        assert_eq!(stored.created_at, 5_000);
        assert_eq!(stored.updated_at, stored.created_at);
    }

    #[test]
    fn create_message_needs_a_generated_author() {
        let (mut engine, _) = engine_with(|_| {});
        assert!(
            engine
                .create_message(AuthorPolicy::RandomGenerated, 0)
                .is_none()
        );
        assert_eq!(engine.store().message_count(), 0);
    }

    #[test]
    fn create_message_with_main_policy() {
        let (mut engine, _) = engine_with(|_| {});
        let id = engine.create_message(AuthorPolicy::Main, 0).unwrap();
        let stored = engine.store().message(&id).unwrap();
        assert!(stored.author_id.is_main());
    }

    #[test]
    fn create_message_applies_delay() {
        let (mut engine, _) = engine_with(|_| {});
        let _ = engine.create_participant();
        let id = engine
            .create_message(AuthorPolicy::RandomGenerated, 30)
            .unwrap();
        let stored = engine.store().message(&id).unwrap();
        assert_eq!(stored.sent_at, 5_030);
        assert_eq!(stored.updated_at, 5_030);
    }

    #[test]
    fn certain_attachment_and_reply() {
        let (mut engine, _) = engine_with(|c| {
            c.probabilities.attachment = 1.0;
            c.probabilities.reply = 1.0;
        });
        let _ = engine.create_participant();
        let first = engine
            .create_message(AuthorPolicy::RandomGenerated, 0)
            .unwrap();
        let second = engine
            .create_message(AuthorPolicy::RandomGenerated, 0)
            .unwrap();

        // no earlier message exists for the first one to reply to
        let first = engine.store().message(&first).unwrap().clone();
        assert!(first.reply_to_id.is_none());
        let second = engine.store().message(&second).unwrap();
        assert_eq!(second.reply_to_id.as_ref(), Some(&first.id));

        let attachment = second.attachments.first().unwrap();
        assert_eq!(second.attachments.len(), 1);
        assert_eq!(attachment.kind, AttachmentKind::Image);
        assert!(ATTACHMENT_SIZES.contains(&(attachment.width, attachment.height)));
    }

    #[test]
    fn reply_targets_always_precede() {
        let (mut engine, _) = engine_with(|c| c.probabilities.reply = 0.5);
        engine.setup();
        for _ in 0..200 {
            let _ = engine.create_message(AuthorPolicy::RandomGenerated, 0);
        }
        let store = engine.store();
        for (position, message) in store.messages().iter().enumerate() {
            if let Some(target) = &message.reply_to_id {
                assert!(store.position(target).unwrap() < position);
            }
        }
    }

    #[test]
    fn add_user_message_rejects_empty_text() {
        let (mut engine, _) = seeded();
        let before = engine.store().message_count();
        assert_eq!(engine.add_user_message(""), Err(EngineError::EmptyText));
        assert_eq!(engine.store().message_count(), before);
    }

    #[test]
    fn add_user_message_appends_main_authored_message() {
        let (mut engine, _) = seeded();
        let before = engine.store().message_count();
        let message = engine.add_user_message("hello").unwrap();
        assert_eq!(engine.store().message_count(), before + 1);
        assert_eq!(message.author_id, engine.store().main_participant().id);
        assert_eq!(message.text, "hello");
        assert!(message.reply_to_id.is_none());
        assert_eq!(engine.store().messages().last(), Some(&message));
    }

    #[test]
    fn user_attachment_probability_is_honored() {
        let (mut engine, _) = engine_with(|c| c.probabilities.user_attachment = 1.0);
        let message = engine.add_user_message("pic").unwrap();
        assert_eq!(message.attachments.len(), 1);

        let (mut engine, _) = engine_with(|c| c.probabilities.user_attachment = 0.0);
        let message = engine.add_user_message("no pic").unwrap();
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn update_random_message_on_empty_store_is_noop() {
        let (mut engine, _) = engine_with(|_| {});
        assert!(engine.update_random_message().is_none());
    }

    #[test]
    fn update_random_message_bumps_updated_at() {
        let (mut engine, clock) = seeded();
        let _ = clock.advance(10_000);
        let id = engine.update_random_message().unwrap();
        let message = engine.store().message(&id).unwrap();
        assert_eq!(message.updated_at, 15_000);
        assert!(message.updated_at >= message.sent_at);
    }

    #[test]
    fn reactions_capped_then_text_edits() {
        let (mut engine, _) = engine_with(|c| {
            c.probabilities.text_edit = 0.0;
            c.probabilities.max_reactions = 3;
        });
        let _ = engine.create_participant();
        let id = engine
            .create_message(AuthorPolicy::RandomGenerated, 0)
            .unwrap();
        let original_text = engine.store().message(&id).unwrap().text.clone();

        for _ in 0..3 {
            let _ = engine.update_random_message();
        }
        let message = engine.store().message(&id).unwrap();
        assert_eq!(message.reactions.len(), 3);
        assert_eq!(message.text, original_text);
        let reactor = &message.reactions.first().unwrap().reactor_id;
        assert!(engine.store().contains_participant(reactor));

        // cap reached: further updates edit text instead
        for _ in 0..5 {
            let _ = engine.update_random_message();
        }
        assert_eq!(engine.store().message(&id).unwrap().reactions.len(), 3);
    }

    #[test]
    fn update_random_participant_skips_main_user() {
        let (mut engine, _) = engine_with(|_| {});
        assert!(engine.update_random_participant().is_none());
        let main_before = engine.store().main_participant().clone();

        let _ = engine.create_participant();
        for _ in 0..20 {
            let id = engine.update_random_participant().unwrap();
            assert!(!id.is_main());
        }
        assert_eq!(engine.store().main_participant(), &main_before);
    }

    #[test]
    fn update_random_participant_changes_one_field() {
        let (mut engine, clock) = engine_with(|c| c.probabilities.display_name_change = 1.0);
        let _ = engine.create_participant();
        let before = engine.store().generated_participants().first().unwrap().clone();
        let _ = clock.advance(1);
        let _ = engine.update_random_participant();
        let after = engine.store().generated_participants().first().unwrap();
        assert_eq!(after.avatar_url, before.avatar_url);
        assert_eq!(after.updated_at, before.updated_at + 1);
        assert_eq!(after.id, before.id);
    }
}
