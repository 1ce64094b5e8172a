//! Domain events folded into channel state.

use crate::error::Result;
use crate::types::{ChannelId, MessageId, ServerId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// An event applied to the channel state.
///
/// Decoding is forward compatible: an unrecognized `type` becomes
/// [`ChannelEvent::Unknown`], which every reducer ignores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChannelEvent {
    /// Initial bulk load of servers, DMs and read states.
    BootstrapSnapshot(BootstrapSnapshot),

    /// The current user read a channel up to `date`.
    MarkChannelRead { channel_id: ChannelId, date: Timestamp },

    /// The current user sent a message (optimistic, before confirmation).
    MessageSent { message: Message },

    /// The server confirmed a message sent by the current user.
    MessageConfirmed { message: Message },

    /// A message was created by anyone, as seen through the live feed.
    RemoteMessageCreated { message: Message },

    /// A message was deleted.
    RemoteMessageRemoved { message: MessageRef },

    /// A message body was edited.
    RemoteMessageUpdated { message: Message },

    /// A user started composing in a channel.
    UserStartedTyping { channel_id: ChannelId, user_id: UserId },

    /// A user stopped composing (timeout, blur, ...).
    TypingEnded { channel_id: ChannelId, user_id: UserId },

    /// Any event kind this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl ChannelEvent {
    /// Decode an event from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read mark for `channel_id` stamped with the current time.
    pub fn mark_read_now(channel_id: impl Into<ChannelId>) -> Self {
        ChannelEvent::MarkChannelRead {
            channel_id: channel_id.into(),
            date: Timestamp::now(),
        }
    }

    /// The wire name of this event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ChannelEvent::BootstrapSnapshot(_) => "bootstrap-snapshot",
            ChannelEvent::MarkChannelRead { .. } => "mark-channel-read",
            ChannelEvent::MessageSent { .. } => "message-sent",
            ChannelEvent::MessageConfirmed { .. } => "message-confirmed",
            ChannelEvent::RemoteMessageCreated { .. } => "remote-message-created",
            ChannelEvent::RemoteMessageRemoved { .. } => "remote-message-removed",
            ChannelEvent::RemoteMessageUpdated { .. } => "remote-message-updated",
            ChannelEvent::UserStartedTyping { .. } => "user-started-typing",
            ChannelEvent::TypingEnded { .. } => "typing-ended",
            ChannelEvent::Unknown => "unknown",
        }
    }

    /// The single channel this event touches. `None` for bootstrap (touches
    /// everything) and unknown events.
    pub fn channel_id(&self) -> Option<&ChannelId> {
        match self {
            ChannelEvent::MarkChannelRead { channel_id, .. }
            | ChannelEvent::UserStartedTyping { channel_id, .. }
            | ChannelEvent::TypingEnded { channel_id, .. } => Some(channel_id),
            ChannelEvent::MessageSent { message }
            | ChannelEvent::MessageConfirmed { message }
            | ChannelEvent::RemoteMessageCreated { message }
            | ChannelEvent::RemoteMessageUpdated { message } => Some(&message.channel),
            ChannelEvent::RemoteMessageRemoved { message } => Some(&message.channel),
            ChannelEvent::BootstrapSnapshot(_) | ChannelEvent::Unknown => None,
        }
    }

    /// Whether this event only affects typing indicators.
    pub fn is_typing(&self) -> bool {
        matches!(
            self,
            ChannelEvent::UserStartedTyping { .. } | ChannelEvent::TypingEnded { .. }
        )
    }
}

/// Full state as delivered on connect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSnapshot {
    #[serde(default)]
    pub servers: Vec<ServerSnapshot>,
    #[serde(default)]
    pub dms: Vec<DmSnapshot>,
    #[serde(default)]
    pub read_states: Vec<ReadStateSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub id: ServerId,
    #[serde(default)]
    pub channels: Vec<ServerChannelSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerChannelSnapshot {
    pub id: ChannelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DmSnapshot {
    pub id: ChannelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default)]
    pub owner: Option<UserId>,
}

/// The current user's read position in one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadStateSnapshot {
    pub channel: ChannelId,
    #[serde(default)]
    pub last_read_at: Option<Timestamp>,
    #[serde(default)]
    pub mention_count: usize,
}

/// A message as carried by create/update events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel: ChannelId,
    pub author: UserId,
    pub created_at: Timestamp,
    /// Rich-text body; see [`crate::mentions`].
    #[serde(default)]
    pub blocks: Vec<serde_json::Value>,
}

/// Identifies a message without its content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: MessageId,
    pub channel: ChannelId,
}

impl From<&Message> for MessageRef {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            channel: message.channel.clone(),
        }
    }
}
