//! In-memory permission override source.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::command::domain::{GuildCommandPermissions, Snowflake};
use crate::command::ports::{
    PermissionOverrideSource, PermissionSourceError, PermissionSourceResult,
};

/// Override source backed by a map. Guilds without entries have no
/// overrides. Counts every fetch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPermissionSource {
    guilds: Arc<RwLock<HashMap<Snowflake, GuildCommandPermissions>>>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryPermissionSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the overrides of a guild.
    pub fn set_guild(&self, guild_id: Snowflake, permissions: GuildCommandPermissions) {
        if let Ok(mut guilds) = self.guilds.write() {
            guilds.insert(guild_id, permissions);
        }
    }

    /// Returns the number of fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionOverrideSource for InMemoryPermissionSource {
    async fn fetch_guild_command_permissions(
        &self,
        guild_id: Snowflake,
    ) -> PermissionSourceResult<GuildCommandPermissions> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let guilds = self.guilds.read().map_err(|err| {
            PermissionSourceError::request(std::io::Error::other(err.to_string()))
        })?;
        Ok(guilds.get(&guild_id).cloned().unwrap_or_default())
    }
}
