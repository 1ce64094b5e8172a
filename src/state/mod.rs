//! Channel state and its reducers.
//!
//! The state is a plain owned value. [`apply_event`] consumes it and returns
//! the next one, so a caller holding an earlier snapshot never observes a
//! change.

mod entries;
mod typing;

pub use entries::EntriesById;
pub use typing::TypingUserIdsByChannelId;

use crate::events::ChannelEvent;
use crate::types::{ChannelId, ChannelRecord, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything the reducers track.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    pub entries_by_id: EntriesById,
    pub typing_user_ids_by_channel_id: TypingUserIdsByChannelId,
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self, id: &ChannelId) -> Option<&ChannelRecord> {
        self.entries_by_id.get(id)
    }

    pub fn channels(&self) -> impl Iterator<Item = &ChannelRecord> {
        self.entries_by_id.values()
    }

    /// Users composing in `id`, in id order.
    pub fn typing_user_ids(&self, id: &ChannelId) -> impl Iterator<Item = &UserId> {
        static EMPTY: BTreeSet<UserId> = BTreeSet::new();
        self.typing_user_ids_by_channel_id
            .get(id)
            .unwrap_or(&EMPTY)
            .iter()
    }
}

/// Apply one event to the state as `me` (the signed-in user).
pub fn apply_event(state: ChannelState, event: &ChannelEvent, me: &UserId) -> ChannelState {
    let ChannelState {
        entries_by_id,
        typing_user_ids_by_channel_id,
    } = state;

    ChannelState {
        entries_by_id: entries::reduce(entries_by_id, event, me),
        typing_user_ids_by_channel_id: typing::reduce(typing_user_ids_by_channel_id, event),
    }
}
