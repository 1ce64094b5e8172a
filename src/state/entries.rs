//! Channel entry reduction: records, read marks and unread mentions.

use crate::events::{BootstrapSnapshot, ChannelEvent, Message, MessageRef, ReadStateSnapshot};
use crate::mentions::mentions_user;
use crate::types::{ChannelId, ChannelKind, ChannelRecord, UnreadMentions, UserId};
use std::collections::{BTreeMap, HashMap};

/// Channel records keyed by id.
pub type EntriesById = BTreeMap<ChannelId, ChannelRecord>;

/// Apply an event to the channel entries.
pub fn reduce(mut entries: EntriesById, event: &ChannelEvent, me: &UserId) -> EntriesById {
    match event {
        ChannelEvent::BootstrapSnapshot(snapshot) => {
            let records = records_from_snapshot(snapshot);
            tracing::info!(channels = records.len(), "applying bootstrap snapshot");
            entries.extend(records.into_iter().map(|record| (record.id.clone(), record)));
        }

        ChannelEvent::MarkChannelRead { channel_id, date } => {
            if let Some(channel) = lookup(&mut entries, channel_id, event) {
                channel.last_read_at = Some(*date);
                channel.unread_mentions.clear();
            }
        }

        ChannelEvent::MessageSent { message } | ChannelEvent::MessageConfirmed { message } => {
            if let Some(channel) = lookup(&mut entries, &message.channel, event) {
                channel.last_read_at = Some(message.created_at);
                channel.last_message_at = Some(message.created_at);
            }
        }

        ChannelEvent::RemoteMessageCreated { message } => {
            if let Some(channel) = lookup(&mut entries, &message.channel, event) {
                channel.last_message_at = Some(message.created_at);
                if &message.author == me {
                    channel.last_read_at = Some(message.created_at);
                }
                if mentions_user(&message.blocks, me) {
                    channel.unread_mentions.insert(message.id.clone());
                }
            }
        }

        ChannelEvent::RemoteMessageRemoved { message: MessageRef { id, channel } } => {
            if let Some(channel) = lookup(&mut entries, channel, event) {
                channel.unread_mentions.remove(id);
            }
        }

        ChannelEvent::RemoteMessageUpdated { message } => {
            if let Some(channel) = lookup(&mut entries, &message.channel, event) {
                apply_mention_edit(&mut channel.unread_mentions, message, me);
            }
        }

        ChannelEvent::UserStartedTyping { .. }
        | ChannelEvent::TypingEnded { .. }
        | ChannelEvent::Unknown => {}
    }

    entries
}

fn lookup<'a>(
    entries: &'a mut EntriesById,
    channel_id: &ChannelId,
    event: &ChannelEvent,
) -> Option<&'a mut ChannelRecord> {
    let channel = entries.get_mut(channel_id);
    if channel.is_none() {
        tracing::debug!(%channel_id, kind = event.kind(), "ignoring event for unknown channel");
    }
    channel
}

fn apply_mention_edit(mentions: &mut UnreadMentions, message: &Message, me: &UserId) {
    if mentions_user(&message.blocks, me) {
        mentions.insert(message.id.clone());
    } else {
        mentions.remove(&message.id);
    }
}

/// Build one record per channel in the snapshot. Server channels come first,
/// then DMs; a later duplicate id replaces an earlier one when merged.
fn records_from_snapshot(snapshot: &BootstrapSnapshot) -> Vec<ChannelRecord> {
    let read_states: HashMap<&ChannelId, &ReadStateSnapshot> = snapshot
        .read_states
        .iter()
        .map(|state| (&state.channel, state))
        .collect();

    let read_position = |id: &ChannelId| {
        read_states
            .get(id)
            .map(|state| (state.last_read_at, state.mention_count))
            .unwrap_or((None, 0))
    };

    let server_channels = snapshot.servers.iter().flat_map(move |server| {
        server.channels.iter().map(move |channel| {
            let (last_read_at, mention_count) = read_position(&channel.id);
            ChannelRecord {
                id: channel.id.clone(),
                name: channel.name.clone(),
                kind: ChannelKind::ServerChannel,
                server_id: Some(server.id.clone()),
                member_user_ids: Vec::new(),
                owner_user_id: None,
                last_message_at: channel.last_message_at,
                last_read_at,
                unread_mentions: UnreadMentions::placeholders(mention_count),
            }
        })
    });

    let dms = snapshot.dms.iter().map(|dm| {
        let (last_read_at, mention_count) = read_position(&dm.id);
        ChannelRecord {
            id: dm.id.clone(),
            name: dm.name.clone(),
            kind: ChannelKind::DirectMessage,
            server_id: None,
            member_user_ids: dm.members.clone(),
            owner_user_id: dm.owner.clone(),
            last_message_at: dm.last_message_at,
            last_read_at,
            unread_mentions: UnreadMentions::placeholders(mention_count),
        }
    });

    server_channels.chain(dms).collect()
}
