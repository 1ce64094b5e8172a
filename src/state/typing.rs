//! Typing indicator reduction.

use crate::events::ChannelEvent;
use crate::types::{ChannelId, UserId};
use std::collections::{BTreeSet, HashMap};

/// Users currently composing, per channel.
pub type TypingUserIdsByChannelId = HashMap<ChannelId, BTreeSet<UserId>>;

/// Apply an event to the typing state.
///
/// Indicators are only ever cleared by a message from the typist or an
/// explicit end signal; expiring stale ones is up to the caller.
pub fn reduce(
    mut typing: TypingUserIdsByChannelId,
    event: &ChannelEvent,
) -> TypingUserIdsByChannelId {
    match event {
        ChannelEvent::UserStartedTyping { channel_id, user_id } => {
            typing
                .entry(channel_id.clone())
                .or_default()
                .insert(user_id.clone());
        }

        ChannelEvent::RemoteMessageCreated { message } => {
            remove(&mut typing, &message.channel, &message.author);
        }

        ChannelEvent::TypingEnded { channel_id, user_id } => {
            remove(&mut typing, channel_id, user_id);
        }

        _ => {}
    }

    typing
}

fn remove(typing: &mut TypingUserIdsByChannelId, channel_id: &ChannelId, user_id: &UserId) {
    if let Some(users) = typing.get_mut(channel_id) {
        users.remove(user_id);
        if users.is_empty() {
            typing.remove(channel_id);
        }
    }
}
