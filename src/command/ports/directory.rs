//! Directory and entity-cache ports.
//!
//! The directory performs remote lookups against the host platform; the
//! entity cache is the host platform's local cache that conversions consult
//! first and populate after a successful fetch. Eviction belongs to the cache
//! implementation.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::{Channel, Member, Role, Snowflake, User};

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Remote lookups of platform entities.
///
/// A missing entity is `Ok(None)`; errors are reserved for failed requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Fetches a user by id.
    async fn fetch_user(&self, user_id: Snowflake) -> DirectoryResult<Option<User>>;

    /// Fetches a user's membership in a guild.
    async fn fetch_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> DirectoryResult<Option<Member>>;

    /// Fetches a guild role.
    async fn fetch_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> DirectoryResult<Option<Role>>;

    /// Fetches a guild channel.
    async fn fetch_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> DirectoryResult<Option<Channel>>;
}

/// Errors returned by directory adapters.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The platform rate-limited the request.
    #[error("directory request rate limited")]
    RateLimited,

    /// Any other request failure.
    #[error("directory request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a request failure from the directory adapter.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}

/// The host platform's local entity cache.
pub trait EntityCache: Send + Sync {
    /// Returns a cached user.
    fn user(&self, user_id: Snowflake) -> Option<User>;

    /// Stores a user.
    fn insert_user(&self, user: User);

    /// Returns a cached guild member.
    fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Member>;

    /// Stores a guild member and its user.
    fn insert_member(&self, member: Member);

    /// Returns a cached role.
    fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<Role>;

    /// Stores a role.
    fn insert_role(&self, role: Role);

    /// Returns a channel from the global channel cache.
    fn channel(&self, channel_id: Snowflake) -> Option<Channel>;

    /// Returns a channel from a guild's channel cache.
    fn guild_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> Option<Channel>;

    /// Stores a channel in the global and, when it has one, guild cache.
    fn insert_channel(&self, channel: Channel);
}
