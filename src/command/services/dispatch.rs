//! Dispatch processor: routes platform events to command handlers.
//!
//! Each event runs through resolve, sub-command resolve, permission check,
//! validation, optional deferral, argument conversion, and invocation.
//! Resolution failures answer with a "not found" notice. Denials are silent
//! on the free-text path; a refused structured interaction still gets an
//! ephemeral notice so the platform sees it acknowledged. Conversion and
//! handler failures answer with a generic error notice.

use mockable::Clock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::conversion::ValueConverter;
use super::cooldown::CallerCooldown;
use super::input::CanonicalInvocation;
use super::permission::{PermissionCache, PermissionEvaluator};
use crate::command::config::DispatchConfig;
use crate::command::domain::{
    CommandDefinition, HandlerKey, InvocationContext, PlatformEvent, SlashInteraction,
    TextInvocation, TextMessage,
};
use crate::command::ports::{
    DirectoryService, EntityCache, Notice, NoticeKind, PermissionOverrideSource, Responder,
};
use crate::command::registry::CommandRegistry;

/// Why an event was dropped without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The message does not start with the activator and a command word.
    NotACommand,
    /// The message was written by a bot.
    BotAuthor,
    /// The caller is inside the cooldown window.
    Cooldown,
    /// The command does not accept free-text invocations.
    TextModeDisabled,
}

/// Why an invocation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// The command is not offered in this context (guild or DM).
    Context,
    /// The caller lacks permission, or permissions could not be checked.
    Permission,
    /// The command's validator refused.
    Validator,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// The handler ran successfully.
    Invoked(HandlerKey),
    /// No command or sub-command matched; a notice was sent.
    NotFound,
    /// The invocation was refused silently.
    Denied(DenyReason),
    /// The event was dropped silently.
    Ignored(IgnoreReason),
    /// Conversion or the handler failed; an error notice was sent.
    Failed(HandlerKey),
    /// The dispatch task panicked or was cancelled. A panic is answered
    /// with an error notice.
    Aborted,
}

/// Routes events against a frozen registry.
pub struct DispatchProcessor<D, E, S, R, C>
where
    D: DirectoryService,
    E: EntityCache,
    S: PermissionOverrideSource,
    R: Responder,
    C: Clock + Send + Sync,
{
    registry: Arc<CommandRegistry>,
    converter: ValueConverter<D, E>,
    permissions: PermissionEvaluator<S, C>,
    cooldown: CallerCooldown<C>,
    responder: Arc<R>,
    config: DispatchConfig,
}

impl<D, E, S, R, C> DispatchProcessor<D, E, S, R, C>
where
    D: DirectoryService,
    E: EntityCache,
    S: PermissionOverrideSource,
    R: Responder,
    C: Clock + Send + Sync,
{
    /// Creates a processor.
    #[must_use]
    pub fn new(
        registry: Arc<CommandRegistry>,
        converter: ValueConverter<D, E>,
        permission_source: Arc<S>,
        responder: Arc<R>,
        clock: Arc<C>,
        config: DispatchConfig,
    ) -> Self {
        if !registry.is_locked() {
            warn!("dispatching against an unlocked command registry");
        }
        let cache = PermissionCache::new(permission_source, Arc::clone(&clock), config.permission_ttl);
        Self {
            registry,
            converter,
            permissions: PermissionEvaluator::new(cache),
            cooldown: CallerCooldown::new(config.caller_cooldown, clock),
            responder,
            config,
        }
    }

    /// Returns the registry the processor routes against.
    #[must_use]
    pub const fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Dispatches one event to completion.
    pub async fn dispatch(&self, event: &PlatformEvent) -> DispatchOutcome {
        match event {
            PlatformEvent::Interaction(interaction) => self.dispatch_interaction(interaction).await,
            PlatformEvent::Message(message) => self.dispatch_message(message).await,
        }
    }

    async fn dispatch_interaction(&self, interaction: &SlashInteraction) -> DispatchOutcome {
        let context = InvocationContext::from_interaction(interaction);
        let invocation = CanonicalInvocation::from_interaction(interaction);
        let Some(definition) = self.registry.get(&invocation.command) else {
            debug!(command = %invocation.command, "unknown command");
            return self.not_found(&context).await;
        };
        self.route(&context, definition, &invocation).await
    }

    async fn dispatch_message(&self, message: &TextMessage) -> DispatchOutcome {
        if message.author.bot {
            return DispatchOutcome::Ignored(IgnoreReason::BotAuthor);
        }
        let Ok(parsed) = TextInvocation::parse(&message.content, self.config.activator) else {
            return DispatchOutcome::Ignored(IgnoreReason::NotACommand);
        };
        if !self.cooldown.try_acquire(message.author.id) {
            debug!(caller = %message.author.id, "caller on cooldown");
            return DispatchOutcome::Ignored(IgnoreReason::Cooldown);
        }

        let context = InvocationContext::from_message(message);
        let Some(definition) = self.registry.get(parsed.command()) else {
            debug!(command = parsed.command(), "unknown command");
            return self.not_found(&context).await;
        };
        let invocation = CanonicalInvocation::from_text(parsed, definition, &self.registry);
        self.route(&context, definition, &invocation).await
    }

    async fn route(
        &self,
        context: &InvocationContext,
        definition: &CommandDefinition,
        invocation: &CanonicalInvocation,
    ) -> DispatchOutcome {
        let resolved = match definition.resolve(invocation.sub_command.as_deref()) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(error = %err, "command resolution failed");
                return self.not_found(context).await;
            }
        };
        if context.is_text() && resolved.settings.text_disabled {
            debug!(handler = %resolved.key, "free-text invocation of a text-disabled command");
            return DispatchOutcome::Ignored(IgnoreReason::TextModeDisabled);
        }
        if !definition.allows_context(context.command_context()) {
            debug!(handler = %resolved.key, "command not offered in this context");
            return self.deny(context, DenyReason::Context).await;
        }
        if !self.is_permitted(context, definition).await {
            return self.deny(context, DenyReason::Permission).await;
        }
        if let Some(validator) = resolved.validator()
            && !validator.validate(context, &invocation.arguments).await
        {
            debug!(handler = %resolved.key, "validator refused invocation");
            return self.deny(context, DenyReason::Validator).await;
        }
        if resolved.settings.defer
            && let Err(err) = self.responder.defer(context).await
        {
            warn!(handler = %resolved.key, error = %err, "failed to defer reply");
        }

        let descriptors = self.registry.descriptors(&resolved.key);
        let arguments = match self
            .converter
            .convert_all(context, &invocation.arguments, descriptors)
            .await
        {
            Ok(arguments) => arguments,
            Err(err) => {
                error!(handler = %resolved.key, error = %err, "argument conversion failed");
                self.notify(context, NoticeKind::UnknownError).await;
                return DispatchOutcome::Failed(resolved.key);
            }
        };

        match resolved.handler().handle(context, &arguments).await {
            Ok(()) => DispatchOutcome::Invoked(resolved.key),
            Err(err) => {
                error!(handler = %resolved.key, error = %err, "command handler failed");
                self.notify(context, NoticeKind::UnknownError).await;
                DispatchOutcome::Failed(resolved.key)
            }
        }
    }

    /// Free-text invocations in a guild always consult the overrides, so a
    /// negative override also blocks commands open to everyone.
    async fn is_permitted(&self, context: &InvocationContext, definition: &CommandDefinition) -> bool {
        if !context.is_text() {
            return true;
        }
        let Some(guild_id) = context.guild_id else {
            return true;
        };
        match self
            .permissions
            .has_permission(
                guild_id,
                definition,
                &context.caller,
                context.channel_id,
                context.member.as_ref(),
            )
            .await
        {
            Ok(granted) => {
                if !granted {
                    debug!(command = %definition.name, caller = %context.caller.id, "permission denied");
                }
                granted
            }
            Err(err) => {
                warn!(command = %definition.name, error = %err, "permission check failed");
                false
            }
        }
    }

    async fn deny(&self, context: &InvocationContext, reason: DenyReason) -> DispatchOutcome {
        if !context.is_text() {
            self.notify(context, NoticeKind::Denied).await;
        }
        DispatchOutcome::Denied(reason)
    }

    async fn not_found(&self, context: &InvocationContext) -> DispatchOutcome {
        self.notify(context, NoticeKind::CommandNotFound).await;
        DispatchOutcome::NotFound
    }

    async fn notify(&self, context: &InvocationContext, kind: NoticeKind) {
        let notice = if context.is_text() {
            match kind {
                NoticeKind::CommandNotFound => {
                    Notice::new(kind).retracted_after(self.config.not_found_retract_after)
                }
                NoticeKind::UnknownError | NoticeKind::Denied => Notice::new(kind),
            }
        } else {
            Notice::new(kind).ephemeral()
        };
        if let Err(err) = self.responder.notify(context, notice).await {
            warn!(notice = ?kind, error = %err, "failed to send notice");
        }
    }
}

impl<D, E, S, R, C> DispatchProcessor<D, E, S, R, C>
where
    D: DirectoryService + 'static,
    E: EntityCache + 'static,
    S: PermissionOverrideSource + 'static,
    R: Responder + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Dispatches an event on its own task.
    ///
    /// A panicking handler fails only its own task; the caller then receives
    /// the generic error notice and the handle yields
    /// [`DispatchOutcome::Aborted`].
    #[must_use]
    pub fn spawn_dispatch(self: &Arc<Self>, event: PlatformEvent) -> JoinHandle<DispatchOutcome> {
        let processor = Arc::clone(self);
        tokio::spawn(async move {
            let context = InvocationContext::from_event(&event);
            let worker = Arc::clone(&processor);
            let joined = tokio::spawn(async move { worker.dispatch(&event).await }).await;
            match joined {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(event = %context.event_id, error = %err, "dispatch task aborted");
                    if err.is_panic() {
                        processor.notify(&context, NoticeKind::UnknownError).await;
                    }
                    DispatchOutcome::Aborted
                }
            }
        })
    }
}
