//! Behaviour tests for routing chat messages and interactions to handlers.

mod test_helpers;

use std::sync::Arc;

use eyre::{Result, ensure, eyre};
use herald::command::{
    adapters::memory::{InMemoryDirectory, RecordingResponder},
    config::DispatchConfig,
    domain::{
        CommandSettings, OptionDescriptor, OptionType, PlatformEvent, SlashInteraction,
        Snowflake, TextMessage, User,
    },
    ports::NoticeKind,
    registry::{CommandRegistry, CommandUnit},
    services::DispatchOutcome,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use test_helpers::{CHANNEL, RecordingHandler, TestProcessor, build_processor, caller_member};

struct DispatchWorld {
    registry: Option<CommandRegistry>,
    directory: InMemoryDirectory,
    kick: Arc<RecordingHandler>,
    report: Arc<RecordingHandler>,
    processor: Option<Arc<TestProcessor>>,
    responder: Option<RecordingResponder>,
    outcomes: Vec<DispatchOutcome>,
    next_event: u64,
}

impl DispatchWorld {
    fn new() -> Self {
        Self {
            registry: Some(CommandRegistry::new()),
            directory: InMemoryDirectory::new(),
            kick: RecordingHandler::new(),
            report: RecordingHandler::new(),
            processor: None,
            responder: None,
            outcomes: Vec::new(),
            next_event: 900_000_000_000_000_100,
        }
    }

    fn registry_mut(&mut self) -> Result<&mut CommandRegistry> {
        self.registry
            .as_mut()
            .ok_or_else(|| eyre!("commands must be declared before dispatching"))
    }

    fn processor(&mut self) -> Result<Arc<TestProcessor>> {
        if let Some(processor) = &self.processor {
            return Ok(Arc::clone(processor));
        }
        let registry = self
            .registry
            .take()
            .ok_or_else(|| eyre!("registry already consumed"))?;
        let (processor, ports) =
            build_processor(registry, self.directory.clone(), DispatchConfig::default())?;
        self.responder = Some(ports.responder);
        self.processor = Some(Arc::clone(&processor));
        Ok(processor)
    }

    fn event_id(&mut self) -> Snowflake {
        self.next_event += 1;
        Snowflake::new(self.next_event)
    }

    fn handler(&self, name: &str) -> Result<&RecordingHandler> {
        match name {
            "kick" => Ok(&self.kick),
            "report" => Ok(&self.report),
            other => Err(eyre!("no test handler named {other}")),
        }
    }

    fn notices(&self) -> Result<Vec<NoticeKind>> {
        let responder = self
            .responder
            .as_ref()
            .ok_or_else(|| eyre!("nothing was dispatched"))?;
        Ok(responder
            .notices()
            .into_iter()
            .map(|notice| notice.kind)
            .collect())
    }

    fn dispatch(&mut self, event: &PlatformEvent) -> Result<()> {
        let processor = self.processor()?;
        let outcome = run_async(processor.dispatch(event));
        self.outcomes.push(outcome);
        Ok(())
    }
}

#[fixture]
fn world() -> DispatchWorld {
    DispatchWorld::new()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[given("a kick command taking a user target and a trailing reason")]
fn kick_command(world: &mut DispatchWorld) -> Result<()> {
    let handler = Arc::clone(&world.kick);
    world.registry_mut()?.register_unit(
        CommandUnit::new("kick", "Removes a member")
            .with_handler(handler)
            .with_option(OptionDescriptor::new("target", OptionType::User).required())
            .with_option(OptionDescriptor::new("reason", OptionType::String).take_rest()),
    )?;
    Ok(())
}

#[given("a report command that is disabled for free text")]
fn report_command(world: &mut DispatchWorld) -> Result<()> {
    let handler = Arc::clone(&world.report);
    world.registry_mut()?.register_unit(
        CommandUnit::new("report", "Reports a message")
            .with_handler(handler)
            .with_settings(CommandSettings::default().text_disabled()),
    )?;
    Ok(())
}

#[given(r#"the directory knows user "{id}" named "{name}""#)]
fn directory_user(world: &mut DispatchWorld, id: String, name: String) -> Result<()> {
    let user_id = Snowflake::parse(&id).ok_or_else(|| eyre!("invalid snowflake {id}"))?;
    world.directory = world.directory.clone().with_user(User::new(user_id, name));
    Ok(())
}

#[when(r#"the member sends "{content}""#)]
fn member_sends(world: &mut DispatchWorld, content: String) -> Result<()> {
    let member = caller_member();
    let message = TextMessage::new(world.event_id(), content, member.user.clone(), CHANNEL)
        .in_guild(member);
    world.dispatch(&PlatformEvent::Message(message))
}

#[when(r#"the member invokes the "{command}" interaction"#)]
fn member_invokes(world: &mut DispatchWorld, command: String) -> Result<()> {
    let member = caller_member();
    let interaction = SlashInteraction::new(world.event_id(), command, member.user.clone(), CHANNEL)
        .in_guild(member);
    world.dispatch(&PlatformEvent::Interaction(interaction))
}

#[then(r#"the kick handler targets "{name}" with reason "{reason}""#)]
fn kick_targets(world: &DispatchWorld, name: String, reason: String) -> Result<()> {
    let calls = world.kick.calls();
    let arguments = calls
        .first()
        .ok_or_else(|| eyre!("kick handler was not called"))?;
    let target = arguments
        .get::<User>("target")
        .ok_or_else(|| eyre!("target was not converted"))?;

    ensure!(target.name == name, "expected target {name}, got {}", target.name);
    ensure!(
        arguments.get::<String>("reason").as_deref() == Some(reason.as_str()),
        "reason was not joined into '{reason}'"
    );
    Ok(())
}

#[then("the {handler} handler runs once")]
fn handler_runs_once(world: &DispatchWorld, handler: String) -> Result<()> {
    let calls = world.handler(&handler)?.calls().len();
    ensure!(calls == 1, "{handler} handler ran {calls} times");
    Ok(())
}

#[then("the {handler} handler never runs")]
fn handler_never_runs(world: &DispatchWorld, handler: String) -> Result<()> {
    ensure!(
        world.handler(&handler)?.calls().is_empty(),
        "{handler} handler should not have run"
    );
    Ok(())
}

#[then("no notice is sent")]
fn no_notice(world: &DispatchWorld) -> Result<()> {
    let notices = world.notices()?;
    ensure!(notices.is_empty(), "unexpected notices: {notices:?}");
    Ok(())
}

#[then("exactly one command-not-found notice is sent")]
fn one_not_found_notice(world: &DispatchWorld) -> Result<()> {
    let notices = world.notices()?;
    ensure!(
        notices == [NoticeKind::CommandNotFound],
        "expected one not-found notice, got {notices:?}"
    );
    ensure!(
        world.outcomes == [DispatchOutcome::NotFound],
        "unexpected outcomes: {:?}",
        world.outcomes
    );
    Ok(())
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Free-text invocation reaches the handler"
)]
#[tokio::test(flavor = "multi_thread")]
async fn free_text_invocation(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Unknown command is answered once"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_command(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Text-disabled command ignores chat messages"
)]
#[tokio::test(flavor = "multi_thread")]
async fn text_disabled_command(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Structured interaction reaches a text-disabled command"
)]
#[tokio::test(flavor = "multi_thread")]
async fn interaction_reaches_text_disabled_command(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Repeat messages inside the cooldown are dropped"
)]
#[tokio::test(flavor = "multi_thread")]
async fn cooldown_drops_repeats(world: DispatchWorld) {
    let _ = world;
}
