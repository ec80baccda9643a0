//! Source of per-guild command permission overrides.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::{GuildCommandPermissions, Snowflake};

/// Result type for permission override fetches.
pub type PermissionSourceResult<T> = Result<T, PermissionSourceError>;

/// Fetches the command permission overrides configured in a guild.
#[async_trait]
pub trait PermissionOverrideSource: Send + Sync {
    /// Returns every override in the guild, keyed by command id.
    async fn fetch_guild_command_permissions(
        &self,
        guild_id: Snowflake,
    ) -> PermissionSourceResult<GuildCommandPermissions>;
}

/// Errors returned by permission override sources.
#[derive(Debug, Clone, Error)]
pub enum PermissionSourceError {
    /// The bot lacks access to the guild.
    #[error("no access to guild {0}")]
    Forbidden(Snowflake),

    /// Any other request failure.
    #[error("permission request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),
}

impl PermissionSourceError {
    /// Wraps a request failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
