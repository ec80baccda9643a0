//! Command synchronization port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::Snowflake;
use crate::command::registry::CommandPayload;

/// Result type for synchronization.
pub type SyncResult<T> = Result<T, SyncError>;

/// A command accepted by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedCommand {
    /// Command name.
    pub name: String,
    /// Platform-assigned id.
    pub id: Snowflake,
}

impl SyncedCommand {
    /// Creates a synced command record.
    #[must_use]
    pub fn new(name: impl Into<String>, id: Snowflake) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Pushes command definitions to the host platform.
#[async_trait]
pub trait CommandSynchronizer: Send + Sync {
    /// Overwrites the platform's command set and returns the assigned ids.
    async fn push(&self, commands: &[CommandPayload]) -> SyncResult<Vec<SyncedCommand>>;
}

/// Errors returned by synchronizer adapters.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The platform refused the payload.
    #[error("command payload rejected: {0}")]
    Rejected(String),

    /// The platform returned an id for a command that is not registered.
    #[error("platform returned unknown command '{0}'")]
    UnknownCommand(String),

    /// Any other request failure.
    #[error("synchronization request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),
}

impl SyncError {
    /// Wraps a request failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
