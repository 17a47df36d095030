//! Read-only feeds over the entity store.
//!
//! Every message feed preserves store order and projects each message into
//! a [`ResolvedMessage`], embedding the reply target one level deep. Since
//! feeds are inclusive: an entity whose `updated_at` equals the threshold
//! is returned.

use chatsim_types::{Message, MessageId, Participant, ResolvedMessage};

use crate::engine::ChatEngine;

impl ChatEngine {
    /// All participants, main user first.
    pub fn list_participants(&self) -> Vec<Participant> {
        self.store.participants().cloned().collect()
    }

    /// Participants modified at or after `since`.
    pub fn list_participants_since(&self, since: u64) -> Vec<Participant> {
        self.store
            .participants()
            .filter(|p| p.updated_at >= since)
            .cloned()
            .collect()
    }

    /// Every message in store order.
    pub fn list_all_messages(&self) -> Vec<ResolvedMessage> {
        self.resolve_all(self.store.messages())
    }

    /// The newest page of messages.
    pub fn list_latest_messages(&self) -> Vec<ResolvedMessage> {
        let messages = self.store.messages();
        let start = messages
            .len()
            .saturating_sub(self.settings.latest_page_size);
        self.resolve_all(messages.get(start..).unwrap_or_default())
    }

    /// The page of messages immediately preceding `before`.
    ///
    /// An unknown id is treated as the start of the store, which yields an
    /// empty page.
    pub fn list_older_messages(&self, before: &MessageId) -> Vec<ResolvedMessage> {
        let end = self.store.position(before).unwrap_or(0);
        let start = end.saturating_sub(self.settings.older_page_size);
        self.resolve_all(self.store.messages().get(start..end).unwrap_or_default())
    }

    /// Messages modified at or after `since`, in store order.
    pub fn list_messages_since(&self, since: u64) -> Vec<ResolvedMessage> {
        self.store
            .messages()
            .iter()
            .filter(|m| m.updated_at >= since)
            .map(|m| self.resolve(m))
            .collect()
    }

    /// Project one message, embedding its reply target.
    pub fn resolve(&self, message: &Message) -> ResolvedMessage {
        let reply_to = message
            .reply_to_id
            .as_ref()
            .and_then(|id| self.store.message(id));
        ResolvedMessage::new(message, reply_to)
    }

    fn resolve_all(&self, messages: &[Message]) -> Vec<ResolvedMessage> {
        messages.iter().map(|m| self.resolve(m)).collect()
    }
}
