//! User and server membership lookups used by the selectors.

use crate::types::{ServerId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user as known to the global directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: Option<String>,
}

/// A user's membership in one server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMember {
    pub user_id: UserId,
    /// Server-specific nickname, falling back to the user's own name.
    pub display_name: Option<String>,
    pub joined_at: Timestamp,
}

impl ServerMember {
    pub fn as_user(&self) -> User {
        User {
            id: self.user_id.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Source of user and membership data.
pub trait MemberDirectory {
    fn user(&self, id: &UserId) -> Option<User>;

    fn server_member(&self, server_id: &ServerId, user_id: &UserId) -> Option<ServerMember>;

    fn server_members(&self, server_id: &ServerId) -> Vec<ServerMember>;
}

/// A [`MemberDirectory`] backed by in-memory maps.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDirectory {
    users: HashMap<UserId, User>,
    members: HashMap<ServerId, HashMap<UserId, ServerMember>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_member(&mut self, server_id: ServerId, member: ServerMember) {
        self.members
            .entry(server_id)
            .or_default()
            .insert(member.user_id.clone(), member);
    }

    /// Builder form of [`insert_user`](Self::insert_user).
    pub fn with_user(mut self, id: &str, display_name: &str) -> Self {
        self.insert_user(User {
            id: UserId::from(id),
            display_name: Some(display_name.to_string()),
        });
        self
    }

    /// Builder form of [`insert_member`](Self::insert_member).
    pub fn with_member(mut self, server_id: &str, user_id: &str, joined_at: Timestamp) -> Self {
        let display_name = self
            .users
            .get(&UserId::from(user_id))
            .and_then(|user| user.display_name.clone());
        self.insert_member(
            ServerId::from(server_id),
            ServerMember {
                user_id: UserId::from(user_id),
                display_name,
                joined_at,
            },
        );
        self
    }
}

impl MemberDirectory for InMemoryDirectory {
    fn user(&self, id: &UserId) -> Option<User> {
        self.users.get(id).cloned()
    }

    fn server_member(&self, server_id: &ServerId, user_id: &UserId) -> Option<ServerMember> {
        self.members.get(server_id)?.get(user_id).cloned()
    }

    fn server_members(&self, server_id: &ServerId) -> Vec<ServerMember> {
        self.members
            .get(server_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }
}
