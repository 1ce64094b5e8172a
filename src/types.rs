//! Core types for the channel store.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a channel (server channel or DM).
    ChannelId
);

string_id!(
    /// Unique identifier for a server.
    ServerId
);

string_id!(
    /// Unique identifier for a user.
    UserId
);

string_id!(
    /// Unique identifier for a message.
    MessageId
);

/// A UTC instant. Serialized as an RFC 3339 string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        Timestamp(Utc::now())
    }

    /// Parse an RFC 3339 / ISO-8601 timestamp.
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(s)?;
        Ok(Timestamp(parsed.with_timezone(&Utc)))
    }

    /// Build from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Timestamp)
    }

    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl FromStr for Timestamp {
    type Err = crate::error::StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Timestamp::parse(s)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Number of events applied by a store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Sequence(pub u64);

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({})", self.0)
    }
}

impl Sequence {
    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }
}

/// What kind of conversation a channel is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    ServerChannel,
    DirectMessage,
}

/// Unread mentions of the current user in one channel.
///
/// `pending` counts mentions reported by a bootstrap snapshot whose message
/// ids are not known. They are opaque: id-based inserts and removals only
/// touch `message_ids`, and only a read mark (or a newer bootstrap) clears
/// them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadMentions {
    pub pending: usize,
    pub message_ids: Vec<MessageId>,
}

impl UnreadMentions {
    /// Mentions known only by count.
    pub fn placeholders(count: usize) -> Self {
        Self {
            pending: count,
            message_ids: Vec::new(),
        }
    }

    /// Total number of unread mentions, placeholders included.
    pub fn len(&self) -> usize {
        self.pending + self.message_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.message_ids.contains(id)
    }

    /// Append a message id unless already present. Returns true if added.
    pub fn insert(&mut self, id: MessageId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.message_ids.push(id);
        true
    }

    /// Remove a message id. Returns true if it was present.
    pub fn remove(&mut self, id: &MessageId) -> bool {
        let before = self.message_ids.len();
        self.message_ids.retain(|existing| existing != id);
        self.message_ids.len() != before
    }

    pub fn clear(&mut self) {
        self.pending = 0;
        self.message_ids.clear();
    }
}

/// A channel as tracked by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: ChannelId,

    /// Display name. DMs usually have none and derive one at read time.
    pub name: Option<String>,

    pub kind: ChannelKind,

    /// Owning server (server channels only).
    pub server_id: Option<ServerId>,

    /// Members (DMs only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member_user_ids: Vec<UserId>,

    /// Owner (DMs only).
    pub owner_user_id: Option<UserId>,

    /// Creation time of the most recent message, if any.
    pub last_message_at: Option<Timestamp>,

    /// When the current user last read the channel.
    pub last_read_at: Option<Timestamp>,

    pub unread_mentions: UnreadMentions,
}

impl ChannelRecord {
    pub fn is_dm(&self) -> bool {
        self.kind == ChannelKind::DirectMessage
    }

    pub fn mention_count(&self) -> usize {
        self.unread_mentions.len()
    }
}
