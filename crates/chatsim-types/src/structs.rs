//! Stored entities of the chat simulation.
//!
//! All timestamps are Unix epoch milliseconds. Entities are created and
//! mutated only by the engine and are never deleted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{AttachmentId, MessageId, ParticipantId, ReactionId};

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A member of the chat session.
///
/// `updated_at` is bumped whenever `display_name` or `avatar_url` changes
/// and is never less than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Participant {
    /// Opaque unique identifier, immutable.
    pub id: ParticipantId,
    /// Human-readable display name.
    pub display_name: String,
    /// Placeholder avatar image URL.
    pub avatar_url: String,
    /// Short profile biography.
    pub bio: String,
    /// Contact email address.
    pub email: String,
    /// Job title shown on the profile card.
    pub job_title: String,
    /// Creation time.
    #[ts(type = "number")]
    pub created_at: u64,
    /// Last modification time.
    #[ts(type = "number")]
    pub updated_at: u64,
}

impl Participant {
    /// Whether this participant is the main user.
    pub fn is_main(&self) -> bool {
        self.id.is_main()
    }

    /// Bump `updated_at` to `now`, never moving it backwards.
    pub fn touch(&mut self, now: u64) {
        self.updated_at = self.updated_at.max(now);
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// Media kind of an attachment. Only images exist in this domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AttachmentKind {
    /// A still image with known dimensions.
    Image,
}

/// A media item attached to a message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Attachment {
    /// Opaque unique identifier.
    pub id: AttachmentId,
    /// Media kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// Placeholder image URL.
    pub url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Reaction
// ---------------------------------------------------------------------------

/// An emoji reaction left on a message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Reaction {
    /// Opaque unique identifier.
    pub id: ReactionId,
    /// The emoji.
    pub value: String,
    /// Participant who reacted.
    pub reactor_id: ParticipantId,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A chat message as kept by the entity store.
///
/// This is the storage representation. Clients never see `reply_to_id`;
/// they receive a [`ResolvedMessage`](crate::views::ResolvedMessage) with
/// the referenced message embedded instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Opaque unique identifier, immutable.
    pub id: MessageId,
    /// Author of the message. Existed when the message was created.
    pub author_id: ParticipantId,
    /// Body text.
    pub text: String,
    /// Attachments, append-only.
    pub attachments: Vec<Attachment>,
    /// Reactions, append-only.
    pub reactions: Vec<Reaction>,
    /// Message this one replies to. Always inserted earlier; never cleared.
    pub reply_to_id: Option<MessageId>,
    /// Arrival time. Defines store order.
    pub sent_at: u64,
    /// Last modification time, never less than `sent_at`.
    pub updated_at: u64,
}

impl Message {
    /// Bump `updated_at` to `now`, never moving it backwards.
    pub fn touch(&mut self, now: u64) {
        self.updated_at = self.updated_at.max(now);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn attachment_kind_serializes_as_type() {
        let attachment = Attachment {
            id: AttachmentId::from("a1"),
            kind: AttachmentKind::Image,
            url: String::from("https://example.test/1.jpg"),
            width: 320,
            height: 320,
        };
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "image");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn participant_uses_camel_case() {
        let participant = Participant {
            id: ParticipantId::main(),
            display_name: String::from("You"),
            avatar_url: String::new(),
            bio: String::new(),
            email: String::new(),
            job_title: String::new(),
            created_at: 5,
            updated_at: 7,
        };
        let json = serde_json::to_value(&participant).unwrap();
        assert_eq!(json["displayName"], "You");
        assert_eq!(json["updatedAt"], 7);
        assert!(participant.is_main());
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut message = Message {
            id: MessageId::from("m1"),
            author_id: ParticipantId::main(),
            text: String::from("hi"),
            attachments: Vec::new(),
            reactions: Vec::new(),
            reply_to_id: None,
            sent_at: 100,
            updated_at: 100,
        };
        message.touch(50);
        assert_eq!(message.updated_at, 100);
        message.touch(150);
        assert_eq!(message.updated_at, 150);
    }
}
