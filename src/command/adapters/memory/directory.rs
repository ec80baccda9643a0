//! In-memory directory service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::command::domain::{Channel, Member, Role, Snowflake, User};
use crate::command::ports::{DirectoryError, DirectoryResult, DirectoryService};

/// Directory backed by seeded entities. Counts every fetch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
    fetches: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<Snowflake, User>,
    members: HashMap<(Snowflake, Snowflake), Member>,
    roles: HashMap<(Snowflake, Snowflake), Role>,
    channels: HashMap<(Snowflake, Snowflake), Channel>,
    failing: bool,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.write(|state| {
            state.users.insert(user.id, user);
        });
        self
    }

    /// Seeds a guild member and its user.
    #[must_use]
    pub fn with_member(self, member: Member) -> Self {
        self.write(|state| {
            state.users.insert(member.user.id, member.user.clone());
            state
                .members
                .insert((member.guild_id, member.user.id), member);
        });
        self
    }

    /// Seeds a role.
    #[must_use]
    pub fn with_role(self, role: Role) -> Self {
        self.write(|state| {
            state.roles.insert((role.guild_id, role.id), role);
        });
        self
    }

    /// Seeds a guild channel.
    #[must_use]
    pub fn with_channel(self, channel: Channel) -> Self {
        if let Some(guild_id) = channel.guild_id {
            self.write(|state| {
                state.channels.insert((guild_id, channel.id), channel);
            });
        }
        self
    }

    /// Makes every subsequent fetch fail.
    pub fn fail_requests(&self) {
        self.write(|state| state.failing = true);
    }

    /// Returns the number of fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn write(&self, apply: impl FnOnce(&mut DirectoryState)) {
        if let Ok(mut state) = self.state.write() {
            apply(&mut state);
        }
    }

    fn read<T>(&self, lookup: impl FnOnce(&DirectoryState) -> Option<T>) -> DirectoryResult<Option<T>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::request(std::io::Error::other(err.to_string())))?;
        if state.failing {
            return Err(DirectoryError::request(std::io::Error::other(
                "directory unavailable",
            )));
        }
        Ok(lookup(&state))
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    async fn fetch_user(&self, user_id: Snowflake) -> DirectoryResult<Option<User>> {
        self.read(|state| state.users.get(&user_id).cloned())
    }

    async fn fetch_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> DirectoryResult<Option<Member>> {
        self.read(|state| state.members.get(&(guild_id, user_id)).cloned())
    }

    async fn fetch_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> DirectoryResult<Option<Role>> {
        self.read(|state| state.roles.get(&(guild_id, role_id)).cloned())
    }

    async fn fetch_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> DirectoryResult<Option<Channel>> {
        self.read(|state| state.channels.get(&(guild_id, channel_id)).cloned())
    }
}
