//! Tests for the permission cache and evaluator.

use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;

use super::fixtures::{
    CALLER, CHANNEL, GUILD, MODERATOR_ROLE, RecordingHandler, administrator, caller, member,
    moderator,
};
use crate::command::adapters::memory::{InMemoryPermissionSource, ManualClock};
use crate::command::domain::{
    CommandDefinition, DefaultPermission, GuildCommandPermissions, OverrideKind,
    PermissionOverride, Permissions, Snowflake,
};
use crate::command::registry::{CommandRegistry, CommandUnit};
use crate::command::services::{PermissionCache, PermissionError, PermissionEvaluator};

const COMMAND_ID: Snowflake = Snowflake::new(400_000_000_000_000_001);
const OPEN_COMMAND_ID: Snowflake = Snowflake::new(400_000_000_000_000_002);

struct PermissionWorld {
    registry: CommandRegistry,
    source: InMemoryPermissionSource,
    clock: Arc<ManualClock>,
    evaluator: PermissionEvaluator<InMemoryPermissionSource, ManualClock>,
}

impl PermissionWorld {
    fn command(&self) -> &CommandDefinition {
        self.registry.get("purge").expect("purge is registered")
    }

    fn open_command(&self) -> &CommandDefinition {
        self.registry.get("echo").expect("echo is registered")
    }

    fn allow(&self, entries: Vec<PermissionOverride>) {
        self.source.set_guild(
            GUILD,
            GuildCommandPermissions::new().with_command(COMMAND_ID, entries),
        );
    }
}

fn build_world(synchronized: bool) -> PermissionWorld {
    let mut registry = CommandRegistry::new();
    registry
        .register_unit(
            CommandUnit::new("purge", "Deletes messages")
                .with_handler(RecordingHandler::new())
                .with_permissions(DefaultPermission::Members(Permissions::MANAGE_MESSAGES)),
        )
        .expect("purge should register");
    registry
        .register_unit(CommandUnit::new("echo", "Repeats text").with_handler(RecordingHandler::new()))
        .expect("echo should register");
    registry.lock().expect("registry should lock");
    if synchronized {
        registry
            .assign_platform_id("purge", COMMAND_ID)
            .expect("id should store");
        registry
            .assign_platform_id("echo", OPEN_COMMAND_ID)
            .expect("id should store");
    }
    let source = InMemoryPermissionSource::new();
    let clock = Arc::new(ManualClock::default());
    let cache = PermissionCache::new(
        Arc::new(source.clone()),
        Arc::clone(&clock),
        Duration::from_secs(300),
    );
    PermissionWorld {
        registry,
        source,
        clock,
        evaluator: PermissionEvaluator::new(cache),
    }
}

#[fixture]
fn world() -> PermissionWorld {
    build_world(true)
}

#[rstest]
#[tokio::test]
async fn administrators_always_pass() {
    let unsynchronized = build_world(false);
    let admin = administrator();

    let granted = unsynchronized
        .evaluator
        .has_permission(GUILD, unsynchronized.command(), &caller(), CHANNEL, Some(&admin))
        .await
        .expect("administrators skip the lookup");

    assert!(granted);
    assert_eq!(unsynchronized.source.fetch_count(), 0);
}

#[rstest]
#[tokio::test]
async fn unsynchronized_command_is_an_error() {
    let unsynchronized = build_world(false);
    let plain = member();

    let error = unsynchronized
        .evaluator
        .has_permission(GUILD, unsynchronized.command(), &caller(), CHANNEL, Some(&plain))
        .await
        .expect_err("command has no platform id");

    assert!(matches!(error, PermissionError::UnsynchronizedCommand(name) if name == "purge"));
}

#[rstest]
#[case::user(PermissionOverride::allow_user(CALLER), member(), true)]
#[case::channel(PermissionOverride::allow_channel(CHANNEL), member(), true)]
#[case::role(PermissionOverride::allow_role(MODERATOR_ROLE), moderator(), true)]
#[case::role_not_held(PermissionOverride::allow_role(MODERATOR_ROLE), member(), false)]
#[case::everyone(PermissionOverride::allow_role(GUILD), member(), true)]
#[case::negative(PermissionOverride::new(CALLER, OverrideKind::User, false), member(), false)]
#[case::other_user(PermissionOverride::allow_user(Snowflake::new(400_000_000_000_000_009)), member(), false)]
#[tokio::test]
async fn overrides_grant_only_when_positive_and_matching(
    world: PermissionWorld,
    #[case] entry: PermissionOverride,
    #[case] invoker: crate::command::domain::Member,
    #[case] expected: bool,
) {
    world.allow(vec![entry]);

    let granted = world
        .evaluator
        .has_permission(GUILD, world.command(), &caller(), CHANNEL, Some(&invoker))
        .await
        .expect("lookup should succeed");

    assert_eq!(granted, expected);
}

#[rstest]
#[tokio::test]
async fn no_overrides_deny(world: PermissionWorld) {
    let plain = member();

    let granted = world
        .evaluator
        .has_permission(GUILD, world.command(), &caller(), CHANNEL, Some(&plain))
        .await
        .expect("lookup should succeed");

    assert!(!granted);
}

#[rstest]
#[tokio::test]
async fn overrides_are_cached_until_ttl_expires(world: PermissionWorld) {
    let plain = member();
    world.allow(vec![PermissionOverride::allow_user(CALLER)]);

    for _ in 0..3 {
        let granted = world
            .evaluator
            .has_permission(GUILD, world.command(), &caller(), CHANNEL, Some(&plain))
            .await
            .expect("lookup should succeed");
        assert!(granted);
    }
    assert_eq!(world.source.fetch_count(), 1);

    world.allow(Vec::new());
    world.clock.advance(Duration::from_secs(299));
    let still_cached = world
        .evaluator
        .has_permission(GUILD, world.command(), &caller(), CHANNEL, Some(&plain))
        .await
        .expect("lookup should succeed");
    world.clock.advance(Duration::from_secs(1));
    let refetched = world
        .evaluator
        .has_permission(GUILD, world.command(), &caller(), CHANNEL, Some(&plain))
        .await
        .expect("lookup should succeed");

    assert!(still_cached);
    assert!(!refetched);
    assert_eq!(world.source.fetch_count(), 2);
}

#[rstest]
#[case::no_overrides(Vec::new(), member(), true)]
#[case::negative_user(vec![PermissionOverride::new(CALLER, OverrideKind::User, false)], member(), false)]
#[case::negative_channel(vec![PermissionOverride::new(CHANNEL, OverrideKind::Channel, false)], member(), false)]
#[case::negative_role(vec![PermissionOverride::new(MODERATOR_ROLE, OverrideKind::Role, false)], moderator(), false)]
#[case::negative_role_not_held(vec![PermissionOverride::new(MODERATOR_ROLE, OverrideKind::Role, false)], member(), true)]
#[case::positive_wins(
    vec![
        PermissionOverride::new(GUILD, OverrideKind::Role, false),
        PermissionOverride::allow_user(CALLER),
    ],
    member(),
    true
)]
#[tokio::test]
async fn open_commands_honour_negative_overrides(
    world: PermissionWorld,
    #[case] entries: Vec<PermissionOverride>,
    #[case] invoker: crate::command::domain::Member,
    #[case] expected: bool,
) {
    world.source.set_guild(
        GUILD,
        GuildCommandPermissions::new().with_command(OPEN_COMMAND_ID, entries),
    );

    let granted = world
        .evaluator
        .has_permission(GUILD, world.open_command(), &caller(), CHANNEL, Some(&invoker))
        .await
        .expect("lookup should succeed");

    assert_eq!(granted, expected);
}

#[rstest]
#[tokio::test]
async fn unsynchronized_open_command_is_allowed_without_lookup() {
    let unsynchronized = build_world(false);
    let plain = member();

    let granted = unsynchronized
        .evaluator
        .has_permission(GUILD, unsynchronized.open_command(), &caller(), CHANNEL, Some(&plain))
        .await
        .expect("open commands need no platform id");

    assert!(granted);
    assert_eq!(unsynchronized.source.fetch_count(), 0);
}
