//! # Channel State
//!
//! Read-state and unread-mention tracking for a chat client's channels.
//!
//! ## Core Concepts
//!
//! - **Events**: bootstrap snapshots, read marks, message and typing updates
//! - **Reducers**: pure functions folding events into [`ChannelState`]
//! - **Selectors**: derived per-channel views (unread flag, mention count,
//!   DM names, typing members)
//! - **Store**: a single-writer handle publishing immutable snapshots
//!
//! ## Example
//!
//! ```ignore
//! use channel_state::{ChannelEvent, ChannelStore, InMemoryDirectory, StoreConfig};
//!
//! let store = ChannelStore::new(StoreConfig::new("me"));
//! store.dispatch_json(&bootstrap_payload)?;
//! store.dispatch(ChannelEvent::mark_read_now("c1"));
//!
//! let state = store.snapshot();
//! let directory = InMemoryDirectory::new().with_user("u2", "Bob");
//! let channel = store.selectors(&state, &directory).select_channel(&"c1".into());
//! ```

pub mod directory;
pub mod error;
pub mod events;
pub mod mentions;
pub mod selectors;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use directory::{InMemoryDirectory, MemberDirectory, ServerMember, User};
pub use error::{Result, StoreError};
pub use events::{
    BootstrapSnapshot, ChannelEvent, DmSnapshot, Message, MessageRef, ReadStateSnapshot,
    ServerChannelSnapshot, ServerSnapshot,
};
pub use mentions::{get_mentions, mentions_user};
pub use selectors::{ChannelView, Selectors};
pub use state::{apply_event, ChannelState, EntriesById, TypingUserIdsByChannelId};
pub use store::{ChannelStore, StoreConfig};
pub use subscriptions::{
    DropReason, StoreUpdate, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
