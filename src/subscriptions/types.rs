//! Subscription types for store change notifications.

use crate::events::ChannelEvent;
use crate::types::{ChannelId, Sequence};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered updates before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only updates touching these channels (None = all channels).
    /// Bootstrap snapshots touch every channel and always match.
    pub channel_ids: Option<Vec<ChannelId>>,

    /// Include typing indicator updates.
    pub include_typing: bool,
}

impl SubscriptionFilter {
    /// Every update, typing included.
    pub fn all() -> Self {
        Self {
            channel_ids: None,
            include_typing: true,
        }
    }

    /// Updates for specific channels, typing included.
    pub fn channels(channel_ids: Vec<ChannelId>) -> Self {
        Self {
            channel_ids: Some(channel_ids),
            include_typing: true,
        }
    }

    /// Whether an applied event passes this filter.
    pub fn matches(&self, event: &ChannelEvent) -> bool {
        if event.is_typing() && !self.include_typing {
            return false;
        }

        match (&self.channel_ids, event.channel_id()) {
            (Some(ids), Some(channel_id)) => ids.contains(channel_id),
            _ => true,
        }
    }
}

/// Notifications emitted by subscriptions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreUpdate {
    /// An event was applied; `sequence` is the store sequence after it.
    Applied {
        sequence: Sequence,
        kind: String,
        channel_id: Option<ChannelId>,
    },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl StoreUpdate {
    pub fn applied(event: &ChannelEvent, sequence: Sequence) -> Self {
        StoreUpdate::Applied {
            sequence,
            kind: event.kind().to_string(),
            channel_id: event.channel_id().cloned(),
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive updates.
    pub receiver: crossbeam_channel::Receiver<StoreUpdate>,
}

impl SubscriptionHandle {
    /// Receive the next update (blocking).
    pub fn recv(&self) -> Result<StoreUpdate, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an update (non-blocking).
    pub fn try_recv(&self) -> Result<StoreUpdate, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreUpdate, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
