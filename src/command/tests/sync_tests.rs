//! Tests for command synchronization.

use rstest::{fixture, rstest};
use std::sync::Arc;

use super::fixtures::RecordingHandler;
use crate::command::adapters::memory::{InMemoryCommandSynchronizer, ManualClock};
use crate::command::domain::Snowflake;
use crate::command::ports::{SyncError, SyncedCommand};
use crate::command::registry::{CommandPayload, CommandRegistry, CommandUnit, RegistrationError};
use crate::command::services::{CommandSyncError, CommandSyncService};

#[fixture]
fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for name in ["ping", "echo"] {
        registry
            .register_unit(CommandUnit::new(name, "Test command").with_handler(RecordingHandler::new()))
            .expect("command should register");
    }
    registry
}

fn service(
    synchronizer: &InMemoryCommandSynchronizer,
) -> CommandSyncService<InMemoryCommandSynchronizer, ManualClock> {
    CommandSyncService::new(
        Arc::new(synchronizer.clone()),
        Arc::new(ManualClock::default()),
    )
}

#[rstest]
#[tokio::test]
async fn synchronization_requires_locked_registry(registry: CommandRegistry) {
    let synchronizer = InMemoryCommandSynchronizer::default();

    let error = service(&synchronizer)
        .synchronize(&registry)
        .await
        .expect_err("registry is unlocked");

    assert!(matches!(error, CommandSyncError::RegistryUnlocked));
    assert!(synchronizer.last_push().is_empty());
}

#[rstest]
#[tokio::test]
async fn synchronization_stores_platform_ids(mut registry: CommandRegistry) {
    registry.lock().expect("registry should lock");
    let synchronizer = InMemoryCommandSynchronizer::starting_at(700_000_000_000_000_001);
    let sync = service(&synchronizer);

    let first = sync.synchronize(&registry).await.expect("push should succeed");
    let second = sync.synchronize(&registry).await.expect("ids are stable");

    assert_eq!(first, second);
    assert_eq!(
        synchronizer
            .last_push()
            .iter()
            .map(|payload| payload.name.as_str())
            .collect::<Vec<_>>(),
        vec!["echo", "ping"]
    );
    for synced in &first {
        assert_eq!(
            registry.get(&synced.name).and_then(|found| found.platform_id()),
            Some(synced.id)
        );
    }
}

struct RenamingSynchronizer;

#[async_trait::async_trait]
impl crate::command::ports::CommandSynchronizer for RenamingSynchronizer {
    async fn push(
        &self,
        commands: &[CommandPayload],
    ) -> crate::command::ports::SyncResult<Vec<SyncedCommand>> {
        Ok(commands
            .iter()
            .map(|payload| SyncedCommand::new(format!("{}-renamed", payload.name), Snowflake::new(1)))
            .collect())
    }
}

#[rstest]
#[tokio::test]
async fn unknown_returned_command_is_reported(mut registry: CommandRegistry) {
    registry.lock().expect("registry should lock");
    let sync = CommandSyncService::new(
        Arc::new(RenamingSynchronizer),
        Arc::new(ManualClock::default()),
    );

    let error = sync
        .synchronize(&registry)
        .await
        .expect_err("names do not match");

    assert!(matches!(
        error,
        CommandSyncError::Sync(SyncError::UnknownCommand(name)) if name == "echo-renamed"
    ));
}

/// Echoes every pushed name with sequential ids, then appends extra entries.
struct AppendingSynchronizer(&'static [&'static str]);

#[async_trait::async_trait]
impl crate::command::ports::CommandSynchronizer for AppendingSynchronizer {
    async fn push(
        &self,
        commands: &[CommandPayload],
    ) -> crate::command::ports::SyncResult<Vec<SyncedCommand>> {
        Ok(commands
            .iter()
            .map(|payload| payload.name.clone())
            .chain(self.0.iter().map(|name| (*name).to_owned()))
            .zip(800_000_000_000_000_001_u64..)
            .map(|(name, id)| SyncedCommand::new(name, Snowflake::new(id)))
            .collect())
    }
}

#[rstest]
#[tokio::test]
async fn rejected_response_stores_no_ids(mut registry: CommandRegistry) {
    registry.lock().expect("registry should lock");
    let sync = CommandSyncService::new(
        Arc::new(AppendingSynchronizer(&["ghost"])),
        Arc::new(ManualClock::default()),
    );

    let error = sync
        .synchronize(&registry)
        .await
        .expect_err("ghost is not registered");

    assert!(matches!(
        error,
        CommandSyncError::Sync(SyncError::UnknownCommand(name)) if name == "ghost"
    ));
    for name in ["echo", "ping"] {
        assert_eq!(
            registry.get(name).and_then(|found| found.platform_id()),
            None,
            "{name} should stay unsynchronized"
        );
    }
}

#[rstest]
#[tokio::test]
async fn conflicting_id_is_detected_before_any_write(mut registry: CommandRegistry) {
    registry.lock().expect("registry should lock");
    let stale = Snowflake::new(700_000_000_000_000_099);
    registry
        .assign_platform_id("ping", stale)
        .expect("first id should store");
    let sync = CommandSyncService::new(
        Arc::new(AppendingSynchronizer(&[])),
        Arc::new(ManualClock::default()),
    );

    let error = sync
        .synchronize(&registry)
        .await
        .expect_err("ping already has a different id");

    assert!(matches!(
        error,
        CommandSyncError::Registration(RegistrationError::PlatformIdConflict { existing, .. })
            if existing == stale
    ));
    assert_eq!(registry.get("echo").and_then(|found| found.platform_id()), None);
}
