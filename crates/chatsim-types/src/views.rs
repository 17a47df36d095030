//! Response projections served by the chat API.
//!
//! Stored [`Message`]s carry a bare `reply_to_id`. Before leaving the
//! engine each message is projected into a [`ResolvedMessage`] that embeds
//! a [`QuotedMessage`] copy of the referenced message instead, so clients
//! can render a quote without a second fetch. Resolution is exactly one
//! level deep: a quoted message never carries its own quote.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{MessageId, ParticipantId, SessionId};
use crate::structs::{Attachment, Message, Reaction};

/// Version number reported by the session info endpoint.
pub const API_VERSION: u32 = 1;

/// A message embedded inside another message as the target of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct QuotedMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Author identifier.
    pub author_id: ParticipantId,
    /// Body text.
    pub text: String,
    /// Attachments in insertion order.
    pub attachments: Vec<Attachment>,
    /// Reactions in insertion order.
    pub reactions: Vec<Reaction>,
    /// Arrival time.
    #[ts(type = "number")]
    pub sent_at: u64,
    /// Last modification time.
    #[ts(type = "number")]
    pub updated_at: u64,
}

impl From<&Message> for QuotedMessage {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            author_id: message.author_id.clone(),
            text: message.text.clone(),
            attachments: message.attachments.clone(),
            reactions: message.reactions.clone(),
            sent_at: message.sent_at,
            updated_at: message.updated_at,
        }
    }
}

/// A message as returned to clients, with its reply target embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ResolvedMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Author identifier.
    pub author_id: ParticipantId,
    /// Body text.
    pub text: String,
    /// Attachments in insertion order.
    pub attachments: Vec<Attachment>,
    /// Reactions in insertion order.
    pub reactions: Vec<Reaction>,
    /// Arrival time.
    #[ts(type = "number")]
    pub sent_at: u64,
    /// Last modification time.
    #[ts(type = "number")]
    pub updated_at: u64,
    /// The message this one replies to, absent when it is not a reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reply_to_message: Option<QuotedMessage>,
}

impl ResolvedMessage {
    /// Project a stored message, embedding `reply_to` when given.
    pub fn new(message: &Message, reply_to: Option<&Message>) -> Self {
        Self {
            id: message.id.clone(),
            author_id: message.author_id.clone(),
            text: message.text.clone(),
            attachments: message.attachments.clone(),
            reactions: message.reactions.clone(),
            sent_at: message.sent_at,
            updated_at: message.updated_at,
            reply_to_message: reply_to.map(QuotedMessage::from),
        }
    }
}

/// Payload of the session info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionInfo {
    /// Identifier of the running engine, stable for the process lifetime.
    pub session_id: SessionId,
    /// API version, currently [`API_VERSION`].
    pub api_version: u32,
}

/// Payload of the scheduler status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SchedulerStatus {
    /// Whether the activity loop is ticking.
    pub running: bool,
    /// Number of ticks evaluated so far.
    #[ts(type = "number")]
    pub tick: u64,
    /// Wall-clock period between ticks.
    #[ts(type = "number")]
    pub tick_interval_ms: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(id: &str, text: &str, reply_to: Option<&str>) -> Message {
        Message {
            id: MessageId::from(id),
            author_id: ParticipantId::from("p1"),
            text: text.to_owned(),
            attachments: Vec::new(),
            reactions: Vec::new(),
            reply_to_id: reply_to.map(MessageId::from),
            sent_at: 10,
            updated_at: 12,
        }
    }

    #[test]
    fn resolved_without_reply_omits_field() {
        let resolved = ResolvedMessage::new(&message("m1", "hello", None), None);
        let json = serde_json::to_value(&resolved).unwrap();
        assert!(json.get("replyToMessage").is_none());
        assert!(json.get("replyToId").is_none());
        assert_eq!(json["text"], "hello");
        assert_eq!(json["sentAt"], 10);
    }

    #[test]
    fn resolved_embeds_quote_without_nested_reply() {
        let target = message("m1", "original", Some("m0"));
        let reply = message("m2", "answer", Some("m1"));
        let resolved = ResolvedMessage::new(&reply, Some(&target));
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["replyToMessage"]["id"], "m1");
        assert_eq!(json["replyToMessage"]["text"], "original");
        assert!(json["replyToMessage"].get("replyToMessage").is_none());
        assert!(json["replyToMessage"].get("replyToId").is_none());
    }

    #[test]
    fn session_info_shape() {
        let info = SessionInfo {
            session_id: SessionId::from("s1"),
            api_version: API_VERSION,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["apiVersion"], 1);
    }
}
