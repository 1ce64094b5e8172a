//! Owning handle around the channel reducers.

use crate::directory::MemberDirectory;
use crate::error::Result;
use crate::events::ChannelEvent;
use crate::selectors::Selectors;
use crate::state::{apply_event, ChannelState};
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Sequence, UserId};
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use std::sync::Arc;

fn default_subscription_buffer_size() -> usize {
    1000
}

/// Store configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    /// The signed-in user. Mentions, own messages and DM names are computed
    /// relative to this user.
    pub current_user_id: UserId,

    /// Buffer size used by [`ChannelStore::subscribe_all`].
    #[serde(default = "default_subscription_buffer_size")]
    pub subscription_buffer_size: usize,
}

impl StoreConfig {
    pub fn new(current_user_id: impl Into<UserId>) -> Self {
        Self {
            current_user_id: current_user_id.into(),
            subscription_buffer_size: default_subscription_buffer_size(),
        }
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The channel store.
///
/// Events are applied one at a time, in call order, by whichever thread
/// calls [`dispatch`](Self::dispatch). Readers take an `Arc` snapshot that
/// later dispatches never modify.
pub struct ChannelStore {
    config: StoreConfig,

    /// Latest published state.
    state: RwLock<Arc<ChannelState>>,

    /// Serializes writers; holds the sequence of the last applied event.
    write_lock: Mutex<Sequence>,

    subscriptions: SubscriptionManager,
}

impl ChannelStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_state(config, ChannelState::new())
    }

    /// Create a store starting from an existing state.
    pub fn with_state(config: StoreConfig, state: ChannelState) -> Self {
        Self {
            config,
            state: RwLock::new(Arc::new(state)),
            write_lock: Mutex::new(Sequence::default()),
            subscriptions: SubscriptionManager::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn current_user_id(&self) -> &UserId {
        &self.config.current_user_id
    }

    /// Apply an event and notify subscribers. Returns the new sequence.
    pub fn dispatch(&self, event: ChannelEvent) -> Sequence {
        let mut sequence = self.write_lock.lock();

        {
            let mut published = self.state.write();
            let current = std::mem::take(&mut *published);
            // Reuse the allocation when no reader holds the old snapshot.
            let current = Arc::try_unwrap(current).unwrap_or_else(|shared| (*shared).clone());
            *published = Arc::new(apply_event(current, &event, &self.config.current_user_id));
        }

        *sequence = sequence.next();
        tracing::trace!(sequence = sequence.0, kind = event.kind(), "applied event");

        self.subscriptions.broadcast_applied(&event, *sequence);
        *sequence
    }

    /// Decode a JSON event and apply it.
    pub fn dispatch_json(&self, json: &str) -> Result<Sequence> {
        let event = ChannelEvent::from_json(json)?;
        Ok(self.dispatch(event))
    }

    /// Current state.
    pub fn snapshot(&self) -> Arc<ChannelState> {
        Arc::clone(&self.state.read())
    }

    /// Number of events applied so far.
    pub fn sequence(&self) -> Sequence {
        *self.write_lock.lock()
    }

    /// Selectors over `state` as the store's current user.
    ///
    /// ```ignore
    /// let state = store.snapshot();
    /// let dms = store.selectors(&state, &directory).select_dm_channels();
    /// ```
    pub fn selectors<'a, D: MemberDirectory + ?Sized>(
        &'a self,
        state: &'a ChannelState,
        directory: &'a D,
    ) -> Selectors<'a, D> {
        Selectors::new(state, directory, &self.config.current_user_id)
    }

    // --- Subscriptions ---

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Subscribe to every update using the configured buffer size.
    pub fn subscribe_all(&self) -> SubscriptionHandle {
        self.subscriptions.subscribe(SubscriptionConfig {
            buffer_size: self.config.subscription_buffer_size,
            filter: crate::subscriptions::SubscriptionFilter::all(),
        })
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }
}
