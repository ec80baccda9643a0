//! In-memory entity cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::command::domain::{Channel, Member, Role, Snowflake, User};
use crate::command::ports::EntityCache;

/// Thread-safe in-memory entity cache with no eviction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityCache {
    state: Arc<RwLock<CacheState>>,
}

#[derive(Debug, Default)]
struct CacheState {
    users: HashMap<Snowflake, User>,
    members: HashMap<(Snowflake, Snowflake), Member>,
    roles: HashMap<(Snowflake, Snowflake), Role>,
    channels: HashMap<Snowflake, Channel>,
    guild_channels: HashMap<(Snowflake, Snowflake), Channel>,
}

impl InMemoryEntityCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a channel only in its guild's cache, leaving the global channel
    /// cache untouched.
    pub fn insert_guild_only_channel(&self, channel: Channel) {
        let Some(guild_id) = channel.guild_id else {
            return;
        };
        if let Ok(mut state) = self.state.write() {
            state.guild_channels.insert((guild_id, channel.id), channel);
        }
    }

    /// Returns the number of cached users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.users.len())
    }
}

impl EntityCache for InMemoryEntityCache {
    fn user(&self, user_id: Snowflake) -> Option<User> {
        self.state.read().ok()?.users.get(&user_id).cloned()
    }

    fn insert_user(&self, user: User) {
        if let Ok(mut state) = self.state.write() {
            state.users.insert(user.id, user);
        }
    }

    fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Member> {
        self.state
            .read()
            .ok()?
            .members
            .get(&(guild_id, user_id))
            .cloned()
    }

    fn insert_member(&self, member: Member) {
        if let Ok(mut state) = self.state.write() {
            state.users.insert(member.user.id, member.user.clone());
            state
                .members
                .insert((member.guild_id, member.user.id), member);
        }
    }

    fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<Role> {
        self.state
            .read()
            .ok()?
            .roles
            .get(&(guild_id, role_id))
            .cloned()
    }

    fn insert_role(&self, role: Role) {
        if let Ok(mut state) = self.state.write() {
            state.roles.insert((role.guild_id, role.id), role);
        }
    }

    fn channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.state.read().ok()?.channels.get(&channel_id).cloned()
    }

    fn guild_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> Option<Channel> {
        self.state
            .read()
            .ok()?
            .guild_channels
            .get(&(guild_id, channel_id))
            .cloned()
    }

    fn insert_channel(&self, channel: Channel) {
        if let Ok(mut state) = self.state.write() {
            if let Some(guild_id) = channel.guild_id {
                state
                    .guild_channels
                    .insert((guild_id, channel.id), channel.clone());
            }
            state.channels.insert(channel.id, channel);
        }
    }
}
