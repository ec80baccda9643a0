//! Shared handlers, validators, and builders for command tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::command::adapters::memory::{
    InMemoryDirectory, InMemoryEntityCache, InMemoryPermissionSource, ManualClock,
    RecordingResponder,
};
use crate::command::config::DispatchConfig;
use crate::command::domain::{
    ArgumentBag, Arguments, CommandHandler, HandlerError, HandlerResult, InvocationContext,
    InvocationValidator, Member, Permissions, SlashInteraction, Snowflake, TextMessage, User,
};
use crate::command::registry::CommandRegistry;
use crate::command::services::{DispatchProcessor, ValueConverter};

pub const GUILD: Snowflake = Snowflake::new(200_000_000_000_000_001);
pub const CHANNEL: Snowflake = Snowflake::new(200_000_000_000_000_002);
pub const CALLER: Snowflake = Snowflake::new(200_000_000_000_000_003);
pub const MODERATOR_ROLE: Snowflake = Snowflake::new(200_000_000_000_000_004);
pub const TARGET: Snowflake = Snowflake::new(200_000_000_000_000_005);
pub const EVENT: Snowflake = Snowflake::new(200_000_000_000_000_006);

/// Handler that records the arguments of every call.
#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<Arguments>>,
    consumed: &'static [&'static str],
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn consuming(options: &'static [&'static str]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            consumed: options,
        })
    }

    pub fn calls(&self) -> Vec<Arguments> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl CommandHandler for RecordingHandler {
    async fn handle(&self, _context: &InvocationContext, arguments: &Arguments) -> HandlerResult {
        self.calls.lock().expect("calls lock").push(arguments.clone());
        Ok(())
    }

    fn consumed_options(&self) -> &'static [&'static str] {
        self.consumed
    }
}

/// Handler that always fails.
pub struct FailingHandler;

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn handle(&self, _context: &InvocationContext, _arguments: &Arguments) -> HandlerResult {
        Err(HandlerError::InvalidInput("target is protected".to_owned()))
    }
}

/// Handler that panics mid-invocation.
pub struct PanickingHandler;

#[async_trait]
impl CommandHandler for PanickingHandler {
    async fn handle(&self, _context: &InvocationContext, _arguments: &Arguments) -> HandlerResult {
        panic!("handler bug");
    }
}

/// Validator with a fixed verdict.
pub struct FixedValidator(pub bool);

#[async_trait]
impl InvocationValidator for FixedValidator {
    async fn validate(&self, _context: &InvocationContext, _arguments: &ArgumentBag) -> bool {
        self.0
    }
}

pub fn caller() -> User {
    User::new(CALLER, "caller")
}

pub fn member() -> Member {
    Member::new(GUILD, caller())
}

pub fn moderator() -> Member {
    member().with_roles([MODERATOR_ROLE])
}

pub fn administrator() -> Member {
    member().with_permissions(Permissions::ADMINISTRATOR)
}

pub fn guild_message(content: &str, author: Member) -> TextMessage {
    TextMessage::new(EVENT, content, author.user.clone(), CHANNEL).in_guild(author)
}

pub fn guild_interaction(command: &str) -> SlashInteraction {
    SlashInteraction::new(EVENT, command, caller(), CHANNEL).in_guild(member())
}

pub type TestProcessor = DispatchProcessor<
    InMemoryDirectory,
    InMemoryEntityCache,
    InMemoryPermissionSource,
    RecordingResponder,
    ManualClock,
>;

/// A processor with handles on every in-memory port.
pub struct Harness {
    pub processor: Arc<TestProcessor>,
    pub responder: RecordingResponder,
    pub permissions: InMemoryPermissionSource,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(registry: CommandRegistry, config: DispatchConfig) -> Self {
        Self::with_directory(registry, config, InMemoryDirectory::new())
    }

    pub fn with_directory(
        mut registry: CommandRegistry,
        config: DispatchConfig,
        directory: InMemoryDirectory,
    ) -> Self {
        registry.lock().expect("registry should lock");
        let responder = RecordingResponder::new();
        let permissions = InMemoryPermissionSource::new();
        let clock = Arc::new(ManualClock::default());
        let converter = ValueConverter::new(
            Arc::new(directory),
            Arc::new(InMemoryEntityCache::new()),
        );
        let processor = DispatchProcessor::new(
            Arc::new(registry),
            converter,
            Arc::new(permissions.clone()),
            Arc::new(responder.clone()),
            Arc::clone(&clock),
            config,
        );
        Self {
            processor: Arc::new(processor),
            responder,
            permissions,
            clock,
        }
    }
}
