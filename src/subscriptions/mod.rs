//! Subscription system for live store updates.
//!
//! Subscribers are told which event was applied and at which sequence; they
//! read the new state through [`ChannelStore::snapshot`](crate::ChannelStore::snapshot).
//!
//! Subscriptions support:
//! - Filtering by channel id and by typing/non-typing updates
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::channels(vec!["c1".into()]),
//!     ..Default::default()
//! });
//!
//! loop {
//!     match handle.recv() {
//!         Ok(StoreUpdate::Applied { sequence, .. }) => redraw(store.snapshot(), sequence),
//!         Ok(StoreUpdate::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StoreUpdate, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
