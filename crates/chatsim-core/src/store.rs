//! The entity store: canonical participant and message collections.
//!
//! The store is append-only. Participants and messages are never removed
//! or reordered, so a position in [`EntityStore::messages`] is stable for
//! the life of the process. Message arrival order is chronological and is
//! the basis for all pagination.
//!
//! Insertion checks the referential invariants (unique id, known author,
//! reply target already stored, non-decreasing `sent_at`) and refuses an
//! entity that would break them.

use std::collections::HashMap;

use chatsim_types::{Message, MessageId, Participant, ParticipantId};

/// Errors raised when an insertion would break a store invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A participant with this id already exists.
    #[error("duplicate participant id: {0}")]
    DuplicateParticipant(ParticipantId),

    /// A message with this id already exists.
    #[error("duplicate message id: {0}")]
    DuplicateMessage(MessageId),

    /// The message author is not a known participant.
    #[error("unknown author: {0}")]
    UnknownAuthor(ParticipantId),

    /// The reply target is not a stored message.
    #[error("unknown reply target: {0}")]
    UnknownReplyTarget(MessageId),

    /// The message would be stored before a later-sent message.
    #[error("message sent at {sent_at} precedes latest stored message at {latest}")]
    OutOfOrder {
        /// `sent_at` of the rejected message.
        sent_at: u64,
        /// `sent_at` of the newest stored message.
        latest: u64,
    },
}

/// Canonical in-memory collections of participants and messages.
#[derive(Debug, Clone)]
pub struct EntityStore {
    /// The main user. Never mutated automatically, never removed.
    main: Participant,
    /// Generated participants in creation order.
    participants: Vec<Participant>,
    /// Messages in arrival order.
    messages: Vec<Message>,
    /// Message id to position in `messages`.
    message_index: HashMap<MessageId, usize>,
}

impl EntityStore {
    /// Create a store holding only the main user.
    pub fn new(main: Participant) -> Self {
        Self {
            main,
            participants: Vec::new(),
            messages: Vec::new(),
            message_index: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Participants
    // -----------------------------------------------------------------------

    /// The main user.
    pub const fn main_participant(&self) -> &Participant {
        &self.main
    }

    /// Generated participants (excluding the main user) in creation order.
    pub fn generated_participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Main user followed by all generated participants.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        std::iter::once(&self.main).chain(self.participants.iter())
    }

    /// Total participant count including the main user.
    pub fn participant_count(&self) -> usize {
        self.participants.len().saturating_add(1)
    }

    /// Whether `id` names the main user or a generated participant.
    pub fn contains_participant(&self, id: &ParticipantId) -> bool {
        self.main.id == *id || self.participants.iter().any(|p| p.id == *id)
    }

    /// Mutable access to the generated participant at `position`.
    pub fn generated_participant_mut(&mut self, position: usize) -> Option<&mut Participant> {
        self.participants.get_mut(position)
    }

    /// Append a generated participant.
    pub fn push_participant(&mut self, participant: Participant) -> Result<(), StoreError> {
        if self.contains_participant(&participant.id) {
            return Err(StoreError::DuplicateParticipant(participant.id));
        }
        self.participants.push(participant);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    /// All messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of stored messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Look up a message by id in O(1).
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.position(id).and_then(|pos| self.messages.get(pos))
    }

    /// Position of a message in arrival order.
    pub fn position(&self, id: &MessageId) -> Option<usize> {
        self.message_index.get(id).copied()
    }

    /// Mutable access to the message at `position`.
    pub fn message_at_mut(&mut self, position: usize) -> Option<&mut Message> {
        self.messages.get_mut(position)
    }

    /// `sent_at` of the newest stored message.
    pub fn latest_sent_at(&self) -> Option<u64> {
        self.messages.last().map(|m| m.sent_at)
    }

    /// Append a message and index it.
    pub fn push_message(&mut self, message: Message) -> Result<(), StoreError> {
        if self.message_index.contains_key(&message.id) {
            return Err(StoreError::DuplicateMessage(message.id));
        }
        if !self.contains_participant(&message.author_id) {
            return Err(StoreError::UnknownAuthor(message.author_id));
        }
        if let Some(target) = &message.reply_to_id {
            if !self.message_index.contains_key(target) {
                return Err(StoreError::UnknownReplyTarget(target.clone()));
            }
        }
        if let Some(latest) = self.latest_sent_at() {
            if message.sent_at < latest {
                return Err(StoreError::OutOfOrder {
                    sent_at: message.sent_at,
                    latest,
                });
            }
        }

        let position = self.messages.len();
        self.message_index.insert(message.id.clone(), position);
        self.messages.push(message);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn participant(id: &str) -> Participant {
        Participant {
            id: ParticipantId::from(id),
            display_name: id.to_owned(),
            avatar_url: String::new(),
            bio: String::new(),
            email: String::new(),
            job_title: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn message(id: &str, author: &str, sent_at: u64, reply_to: Option<&str>) -> Message {
        Message {
            id: MessageId::from(id),
            author_id: ParticipantId::from(author),
            text: String::from("text"),
            attachments: Vec::new(),
            reactions: Vec::new(),
            reply_to_id: reply_to.map(MessageId::from),
            sent_at,
            updated_at: sent_at,
        }
    }

    fn store() -> EntityStore {
        let mut store = EntityStore::new(participant("you"));
        store.push_participant(participant("p1")).unwrap();
        store
    }

    #[test]
    fn main_user_comes_first() {
        let store = store();
        let ids: Vec<&str> = store.participants().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["you", "p1"]);
        assert_eq!(store.participant_count(), 2);
    }

    #[test]
    fn push_and_lookup_message() {
        let mut store = store();
        store.push_message(message("m1", "p1", 10, None)).unwrap();
        store.push_message(message("m2", "you", 10, Some("m1"))).unwrap();

        assert_eq!(store.message_count(), 2);
        assert_eq!(store.position(&MessageId::from("m2")), Some(1));
        assert_eq!(
            store.message(&MessageId::from("m1")).map(|m| m.sent_at),
            Some(10)
        );
        assert!(store.message(&MessageId::from("nope")).is_none());
    }

    #[test]
    fn duplicate_message_is_rejected() {
        let mut store = store();
        store.push_message(message("m1", "p1", 10, None)).unwrap();
        let result = store.push_message(message("m1", "p1", 11, None));
        assert_eq!(
            result,
            Err(StoreError::DuplicateMessage(MessageId::from("m1")))
        );
        assert_eq!(store.message_count(), 1);
    }

    #[test]
    fn duplicate_participant_is_rejected() {
        let mut store = store();
        let result = store.push_participant(participant("you"));
        assert!(matches!(result, Err(StoreError::DuplicateParticipant(_))));
        assert_eq!(store.participant_count(), 2);
    }

    #[test]
    fn unknown_author_is_rejected() {
        let mut store = store();
        let result = store.push_message(message("m1", "ghost", 10, None));
        assert!(matches!(result, Err(StoreError::UnknownAuthor(_))));
    }

    #[test]
    fn forward_reply_is_rejected() {
        let mut store = store();
        let result = store.push_message(message("m1", "p1", 10, Some("m2")));
        assert!(matches!(result, Err(StoreError::UnknownReplyTarget(_))));
    }

    #[test]
    fn out_of_order_message_is_rejected() {
        let mut store = store();
        store.push_message(message("m1", "p1", 10, None)).unwrap();
        let result = store.push_message(message("m2", "p1", 9, None));
        assert_eq!(
            result,
            Err(StoreError::OutOfOrder {
                sent_at: 9,
                latest: 10
            })
        );
    }

    #[test]
    fn in_place_mutation_keeps_order() {
        let mut store = store();
        store.push_message(message("m1", "p1", 10, None)).unwrap();
        store.push_message(message("m2", "p1", 20, None)).unwrap();
        if let Some(first) = store.message_at_mut(0) {
            first.text = String::from("edited");
        }
        let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert_eq!(store.messages().first().map(|m| m.text.as_str()), Some("edited"));
    }
}
