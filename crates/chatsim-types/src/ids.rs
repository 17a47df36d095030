//! Type-safe identifier wrappers around opaque strings.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. Fresh IDs are
//! UUID v4 strings; on the wire they are plain JSON strings.
//!
//! The main user is the one participant with a fixed, well-known ID
//! ([`MAIN_PARTICIPANT_ID`]) so clients can recognise their own messages.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Well-known identifier of the main (local demo) user.
pub const MAIN_PARTICIPANT_ID: &str = "you";

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a new statistically-unique identifier (UUID v4).
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a chat participant.
    ParticipantId
}

define_id! {
    /// Unique identifier for a chat message.
    MessageId
}

define_id! {
    /// Unique identifier for a message attachment.
    AttachmentId
}

define_id! {
    /// Unique identifier for a reaction on a message.
    ReactionId
}

define_id! {
    /// Identifier of one engine lifetime, generated once at startup.
    SessionId
}

impl ParticipantId {
    /// The fixed identifier of the main user.
    pub fn main() -> Self {
        Self::from(MAIN_PARTICIPANT_ID)
    }

    /// Whether this identifier names the main user.
    pub fn is_main(&self) -> bool {
        self.0 == MAIN_PARTICIPANT_ID
    }
}
