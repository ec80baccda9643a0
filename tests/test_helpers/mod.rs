//! Shared handlers and a dispatch harness for integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use herald::command::{
    adapters::memory::{
        InMemoryDirectory, InMemoryEntityCache, InMemoryPermissionSource, ManualClock,
        RecordingResponder,
    },
    config::DispatchConfig,
    domain::{Arguments, CommandHandler, HandlerResult, InvocationContext, Member, Snowflake, User},
    registry::CommandRegistry,
    services::{DispatchProcessor, ValueConverter},
};

/// Guild every test member belongs to.
pub const GUILD: Snowflake = Snowflake::new(900_000_000_000_000_001);
/// Channel every test message is posted in.
pub const CHANNEL: Snowflake = Snowflake::new(900_000_000_000_000_002);
/// The invoking user.
pub const CALLER: Snowflake = Snowflake::new(900_000_000_000_000_003);

/// Processor wired to in-memory adapters.
pub type TestProcessor = DispatchProcessor<
    InMemoryDirectory,
    InMemoryEntityCache,
    InMemoryPermissionSource,
    RecordingResponder,
    ManualClock,
>;

/// Handler that records the arguments it was called with.
#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<Arguments>>,
}

impl RecordingHandler {
    /// Creates a shared handler.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns every call's arguments in order.
    pub fn calls(&self) -> Vec<Arguments> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CommandHandler for RecordingHandler {
    async fn handle(&self, _context: &InvocationContext, arguments: &Arguments) -> HandlerResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(arguments.clone());
        Ok(())
    }
}

/// Returns the invoking guild member.
pub fn caller_member() -> Member {
    Member::new(GUILD, User::new(CALLER, "caller"))
}

/// Ports retained by a test after building a processor.
pub struct Ports {
    /// Records notices and deferrals.
    pub responder: RecordingResponder,
    /// Serves permission overrides.
    pub permissions: InMemoryPermissionSource,
    /// Drives cooldown and cache expiry.
    pub clock: Arc<ManualClock>,
}

/// Locks `registry` and builds a processor over in-memory adapters.
pub fn build_processor(
    mut registry: CommandRegistry,
    directory: InMemoryDirectory,
    config: DispatchConfig,
) -> eyre::Result<(Arc<TestProcessor>, Ports)> {
    registry.lock()?;
    let ports = Ports {
        responder: RecordingResponder::new(),
        permissions: InMemoryPermissionSource::new(),
        clock: Arc::new(ManualClock::default()),
    };
    let processor = DispatchProcessor::new(
        Arc::new(registry),
        ValueConverter::new(Arc::new(directory), Arc::new(InMemoryEntityCache::new())),
        Arc::new(ports.permissions.clone()),
        Arc::new(ports.responder.clone()),
        Arc::clone(&ports.clock),
        config,
    );
    Ok((Arc::new(processor), ports))
}
