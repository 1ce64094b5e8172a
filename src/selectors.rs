//! Derived, read-only views over [`ChannelState`].

use crate::directory::{MemberDirectory, User};
use crate::error::{Result, StoreError};
use crate::state::ChannelState;
use crate::types::{ChannelId, ChannelKind, ChannelRecord, ServerId, Timestamp, UserId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Name shown for a DM whose only member is the current user.
const SELF_DM_NAME: &str = "Me";

/// A channel as presented to the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChannelView {
    pub id: ChannelId,
    pub name: Option<String>,
    pub kind: ChannelKind,
    pub server_id: Option<ServerId>,
    pub member_user_ids: Vec<UserId>,
    pub owner_user_id: Option<UserId>,
    pub last_message_at: Option<Timestamp>,
    pub last_read_at: Option<Timestamp>,
    pub has_unread: bool,
    pub mention_count: usize,
    /// Other users composing right now.
    pub typing_members: Vec<User>,
}

/// Selector functions bound to one state snapshot.
///
/// `now` stands in for the read position of DMs that were never read (and of
/// server channels whose membership record is missing), which makes them
/// read unless a message arrives later than `now`.
pub struct Selectors<'a, D: MemberDirectory + ?Sized> {
    state: &'a ChannelState,
    directory: &'a D,
    me: &'a UserId,
    now: Timestamp,
}

impl<'a, D: MemberDirectory + ?Sized> Selectors<'a, D> {
    pub fn new(state: &'a ChannelState, directory: &'a D, me: &'a UserId) -> Self {
        Self {
            state,
            directory,
            me,
            now: Timestamp::now(),
        }
    }

    /// Evaluate as of `now` instead of the wall clock.
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    pub fn select_channel(&self, id: &ChannelId) -> Option<ChannelView> {
        self.state.channel(id).map(|record| self.view(record))
    }

    /// Channels belonging to `server_id`.
    pub fn select_server_channels(&self, server_id: &ServerId) -> Vec<ChannelView> {
        self.state
            .channels()
            .filter(|record| record.server_id.as_ref() == Some(server_id))
            .map(|record| self.view(record))
            .collect()
    }

    /// All DMs, most recent message first.
    pub fn select_dm_channels(&self) -> Vec<ChannelView> {
        self.views_by_recency(self.state.channels().filter(|record| record.is_dm()))
    }

    /// DMs whose members all belong to `server_id`.
    pub fn select_server_dm_channels(&self, server_id: &ServerId) -> Vec<ChannelView> {
        let member_ids: BTreeSet<UserId> = self
            .directory
            .server_members(server_id)
            .into_iter()
            .map(|member| member.user_id)
            .collect();

        self.views_by_recency(self.state.channels().filter(|record| {
            record.is_dm()
                && record
                    .member_user_ids
                    .iter()
                    .all(|id| member_ids.contains(id))
        }))
    }

    /// The 1:1 DM with `user_id`, or the self-DM when `user_id` is the
    /// current user.
    ///
    /// More than one candidate means the upstream data is corrupt and is
    /// reported as [`StoreError::ConsistencyViolation`].
    pub fn select_dm_channel_from_user_id(&self, user_id: &UserId) -> Result<Option<ChannelView>> {
        let wanted: BTreeSet<&UserId> = [self.me, user_id].into_iter().collect();
        let candidates: Vec<&ChannelRecord> = self
            .state
            .channels()
            .filter(|record| {
                record.is_dm() && record.member_user_ids.iter().collect::<BTreeSet<_>>() == wanted
            })
            .collect();

        match candidates.as_slice() {
            [] => Ok(None),
            [record] => Ok(Some(self.view(record))),
            _ => {
                let ids: Vec<&str> = candidates.iter().map(|record| record.id.as_str()).collect();
                tracing::warn!(%user_id, channels = ?ids, "multiple 1:1 DMs for user");
                Err(StoreError::ConsistencyViolation(format!(
                    "{} direct message channels with user {}: {}",
                    ids.len(),
                    user_id,
                    ids.join(", ")
                )))
            }
        }
    }

    /// The DM whose member set is exactly `user_ids`.
    pub fn select_dm_channel_from_user_ids(&self, user_ids: &[UserId]) -> Option<ChannelView> {
        let wanted: BTreeSet<&UserId> = user_ids.iter().collect();
        self.state
            .channels()
            .find(|record| {
                record.is_dm() && record.member_user_ids.iter().collect::<BTreeSet<_>>() == wanted
            })
            .map(|record| self.view(record))
    }

    /// Raw typing set for a channel, current user included.
    pub fn select_channel_typing_user_ids(&self, id: &ChannelId) -> Vec<UserId> {
        self.state.typing_user_ids(id).cloned().collect()
    }

    fn views_by_recency<'r>(
        &self,
        records: impl Iterator<Item = &'r ChannelRecord>,
    ) -> Vec<ChannelView> {
        let mut views: Vec<ChannelView> = records.map(|record| self.view(record)).collect();
        // Stable: equal timestamps keep id order. Missing timestamps sort last.
        views.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        views
    }

    fn view(&self, record: &ChannelRecord) -> ChannelView {
        let has_unread = match record.last_message_at {
            Some(last_message_at) => self.last_read_timestamp(record) < last_message_at,
            None => false,
        };

        ChannelView {
            id: record.id.clone(),
            name: self.display_name(record),
            kind: record.kind,
            server_id: record.server_id.clone(),
            member_user_ids: record.member_user_ids.clone(),
            owner_user_id: record.owner_user_id.clone(),
            last_message_at: record.last_message_at,
            last_read_at: record.last_read_at,
            has_unread,
            mention_count: record.mention_count(),
            typing_members: self.typing_members(record),
        }
    }

    fn last_read_timestamp(&self, record: &ChannelRecord) -> Timestamp {
        if let Some(last_read_at) = record.last_read_at {
            return last_read_at;
        }

        match (&record.kind, &record.server_id) {
            (ChannelKind::ServerChannel, Some(server_id)) => {
                match self.directory.server_member(server_id, self.me) {
                    Some(member) => member.joined_at,
                    None => {
                        tracing::debug!(
                            %server_id,
                            channel_id = %record.id,
                            "no membership for current user"
                        );
                        self.now
                    }
                }
            }
            _ => self.now,
        }
    }

    fn display_name(&self, record: &ChannelRecord) -> Option<String> {
        if !record.is_dm() || record.name.is_some() {
            return record.name.clone();
        }

        if record.member_user_ids.len() == 1 {
            return Some(SELF_DM_NAME.to_string());
        }

        let names: Vec<String> = record
            .member_user_ids
            .iter()
            .filter(|id| *id != self.me)
            .filter_map(|id| self.directory.user(id)?.display_name)
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    fn typing_members(&self, record: &ChannelRecord) -> Vec<User> {
        self.state
            .typing_user_ids(&record.id)
            .filter(|id| *id != self.me)
            .filter_map(|id| match (&record.kind, &record.server_id) {
                (ChannelKind::ServerChannel, Some(server_id)) => self
                    .directory
                    .server_member(server_id, id)
                    .map(|member| member.as_user()),
                _ => self.directory.user(id),
            })
            .collect()
    }
}
