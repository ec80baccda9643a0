//! Permission cache and evaluator for free-text invocations.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::command::domain::{
    CommandDefinition, GuildCommandPermissions, Member, OverrideKind, PermissionOverride,
    Snowflake, User,
};
use crate::command::ports::{PermissionOverrideSource, PermissionSourceError};

/// Result type for permission checks.
pub type PermissionResult<T> = Result<T, PermissionError>;

/// Errors raised while evaluating command permissions.
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    /// The command has no platform id yet, so its overrides cannot be found.
    #[error("command '{0}' has not been synchronized")]
    UnsynchronizedCommand(String),

    /// The override source failed.
    #[error(transparent)]
    Source(#[from] PermissionSourceError),
}

/// A guild's overrides and when they were fetched.
#[derive(Debug, Clone)]
pub struct PermissionCacheEntry {
    /// Overrides keyed by command id.
    pub overrides: Arc<GuildCommandPermissions>,
    /// Capture timestamp.
    pub captured_at: DateTime<Utc>,
}

impl PermissionCacheEntry {
    /// Returns `true` while the entry is younger than `ttl`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.captured_at
            .checked_add_signed(ttl)
            .is_none_or(|expires| now < expires)
    }
}

/// TTL-bounded cache of per-guild overrides.
///
/// Entries are refetched on miss or expiry and never invalidated otherwise.
/// Concurrent misses for one guild may both fetch; the later write wins.
pub struct PermissionCache<S, C>
where
    S: PermissionOverrideSource,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    clock: Arc<C>,
    ttl: TimeDelta,
    entries: RwLock<HashMap<Snowflake, PermissionCacheEntry>>,
}

impl<S, C> PermissionCache<S, C>
where
    S: PermissionOverrideSource,
    C: Clock + Send + Sync,
{
    /// Creates an empty cache. A zero TTL refetches on every lookup.
    #[must_use]
    pub fn new(source: Arc<S>, clock: Arc<C>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the guild's overrides, fetching them when absent or stale.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionSourceError`] when a fetch fails.
    pub async fn guild_permissions(
        &self,
        guild_id: Snowflake,
    ) -> Result<Arc<GuildCommandPermissions>, PermissionSourceError> {
        let now = self.clock.utc();
        if let Some(overrides) = self.fresh_entry(guild_id, now) {
            return Ok(overrides);
        }

        debug!(guild = %guild_id, "fetching guild command permissions");
        let overrides = Arc::new(
            self.source
                .fetch_guild_command_permissions(guild_id)
                .await?,
        );
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                guild_id,
                PermissionCacheEntry {
                    overrides: Arc::clone(&overrides),
                    captured_at: now,
                },
            );
        }
        Ok(overrides)
    }

    fn fresh_entry(
        &self,
        guild_id: Snowflake,
        now: DateTime<Utc>,
    ) -> Option<Arc<GuildCommandPermissions>> {
        if self.ttl.is_zero() {
            return None;
        }
        let entries = self.entries.read().ok()?;
        entries
            .get(&guild_id)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.overrides))
    }
}

/// Decides whether a caller may run a command in a guild.
pub struct PermissionEvaluator<S, C>
where
    S: PermissionOverrideSource,
    C: Clock + Send + Sync,
{
    cache: PermissionCache<S, C>,
}

impl<S, C> PermissionEvaluator<S, C>
where
    S: PermissionOverrideSource,
    C: Clock + Send + Sync,
{
    /// Creates an evaluator over a cache.
    #[must_use]
    pub const fn new(cache: PermissionCache<S, C>) -> Self {
        Self { cache }
    }

    /// Checks the caller against the command's overrides in `guild_id`.
    ///
    /// Administrators always pass. Otherwise any positive override matching
    /// the caller, the channel, or one of the member's roles grants access.
    /// When only negative overrides match, access is denied. With no match
    /// at all, restricted commands are denied and open commands allowed; an
    /// open command that was never synchronized cannot carry overrides and
    /// is allowed without a lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::UnsynchronizedCommand`] when a restricted
    /// command has no platform id and [`PermissionError::Source`] when the
    /// overrides cannot be fetched.
    pub async fn has_permission(
        &self,
        guild_id: Snowflake,
        command: &CommandDefinition,
        caller: &User,
        channel_id: Snowflake,
        member: Option<&Member>,
    ) -> PermissionResult<bool> {
        if member.is_some_and(|found| found.permissions.is_administrator()) {
            return Ok(true);
        }
        let restricted = command.default_permission.is_restricted();
        let Some(command_id) = command.platform_id() else {
            return if restricted {
                Err(PermissionError::UnsynchronizedCommand(command.name.clone()))
            } else {
                Ok(true)
            };
        };
        let overrides = self.cache.guild_permissions(guild_id).await?;
        let matching: Vec<&PermissionOverride> = overrides
            .for_command(command_id)
            .iter()
            .filter(|entry| applies_to(entry, caller, channel_id, member))
            .collect();
        if matching.iter().any(|entry| entry.permission) {
            return Ok(true);
        }
        Ok(matching.is_empty() && !restricted)
    }
}

fn applies_to(
    entry: &PermissionOverride,
    caller: &User,
    channel_id: Snowflake,
    member: Option<&Member>,
) -> bool {
    match entry.kind {
        OverrideKind::User => entry.id == caller.id,
        OverrideKind::Channel => entry.id == channel_id,
        OverrideKind::Role => member.is_some_and(|found| found.has_role(entry.id)),
    }
}
