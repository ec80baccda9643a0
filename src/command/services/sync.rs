//! Command synchronization service.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::command::ports::{CommandSynchronizer, SyncError, SyncedCommand};
use crate::command::registry::{CommandRegistry, RegistrationError};

/// Errors raised while synchronizing commands.
#[derive(Debug, Clone, Error)]
pub enum CommandSyncError {
    /// Commands can only be pushed once the registry is locked.
    #[error("command registry must be locked before synchronization")]
    RegistryUnlocked,

    /// The push failed or returned unknown commands.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A returned id could not be stored.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Pushes the registry to the platform and records the assigned ids.
pub struct CommandSyncService<Y, C>
where
    Y: CommandSynchronizer,
    C: Clock + Send + Sync,
{
    synchronizer: Arc<Y>,
    clock: Arc<C>,
}

impl<Y, C> CommandSyncService<Y, C>
where
    Y: CommandSynchronizer,
    C: Clock + Send + Sync,
{
    /// Creates a synchronization service.
    #[must_use]
    pub const fn new(synchronizer: Arc<Y>, clock: Arc<C>) -> Self {
        Self {
            synchronizer,
            clock,
        }
    }

    /// Pushes every command and writes the returned ids onto `registry`.
    ///
    /// Ids are write-once: pushing again is fine as long as the platform
    /// returns the same ids. The whole response is checked before any id is
    /// stored, so a rejected response leaves the registry untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CommandSyncError::RegistryUnlocked`] before the freeze,
    /// [`SyncError::UnknownCommand`] when the platform returns a name the
    /// registry does not hold, and [`RegistrationError::PlatformIdConflict`]
    /// when an id differs from one already stored.
    pub async fn synchronize(
        &self,
        registry: &CommandRegistry,
    ) -> Result<Vec<SyncedCommand>, CommandSyncError> {
        if !registry.is_locked() {
            return Err(CommandSyncError::RegistryUnlocked);
        }
        let started_at = self.clock.utc();
        let synced = self.synchronizer.push(&registry.command_payloads()).await?;

        for command in &synced {
            verify_synced(registry, command)?;
        }
        for command in &synced {
            registry.assign_platform_id(&command.name, command.id)?;
        }

        let elapsed = self.clock.utc().signed_duration_since(started_at);
        info!(
            commands = synced.len(),
            elapsed_ms = elapsed.num_milliseconds(),
            "commands synchronized"
        );
        Ok(synced)
    }
}

fn verify_synced(registry: &CommandRegistry, command: &SyncedCommand) -> Result<(), CommandSyncError> {
    let Some(definition) = registry.get(&command.name) else {
        return Err(SyncError::UnknownCommand(command.name.clone()).into());
    };
    if let Some(existing) = definition.platform_id()
        && existing != command.id
    {
        return Err(RegistrationError::PlatformIdConflict {
            command: definition.name.clone(),
            existing,
        }
        .into());
    }
    Ok(())
}
