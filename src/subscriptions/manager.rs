//! Subscription manager for broadcasting store updates.

use crate::events::ChannelEvent;
use crate::types::Sequence;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{DropReason, StoreUpdate, SubscriptionConfig, SubscriptionHandle, SubscriptionId};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<StoreUpdate>,
}

impl Subscription {
    /// Try to send an update. Returns false if buffer is full or the receiver
    /// is gone (subscriber will be dropped).
    fn try_send(&self, update: StoreUpdate) -> bool {
        self.sender.try_send(update).is_ok()
    }
}

/// Manages subscriptions and broadcasts updates.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription. Only updates applied after this call are
    /// delivered.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(sub) = self.subscriptions.write().remove(&id) {
            // Best effort
            let _ = sub.sender.try_send(StoreUpdate::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Notify matching subscriptions that `event` was applied. Drops
    /// subscribers that fail to receive.
    pub fn broadcast_applied(&self, event: &ChannelEvent, sequence: Sequence) {
        let update = StoreUpdate::applied(event, sequence);
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.config.filter.matches(event) && !sub.try_send(update.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    tracing::debug!(subscription = id.0, "dropping slow subscriber");
                    let _ = sub.sender.try_send(StoreUpdate::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
