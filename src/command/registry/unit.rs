//! Declarative command units.
//!
//! A unit collects every declaration for one command in whatever order the
//! caller writes them. [`CommandRegistry::register_unit`] then materializes
//! the definition in a fixed order, so option and policy declarations can
//! never run ahead of the command they belong to.
//!
//! [`CommandRegistry::register_unit`]: super::CommandRegistry::register_unit

use std::sync::Arc;

use crate::command::domain::{
    CommandContext, CommandHandler, CommandSettings, DefaultPermission, IntegrationType,
    InvocationValidator, OptionDescriptor,
};

/// All declarations for one sub-command.
#[derive(Clone)]
pub struct SubCommandUnit {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) handler: Arc<dyn CommandHandler>,
    pub(super) options: Vec<OptionDescriptor>,
    pub(super) settings: CommandSettings,
    pub(super) validator: Option<Arc<dyn InvocationValidator>>,
}

impl SubCommandUnit {
    /// Starts a sub-command declaration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler,
            options: Vec::new(),
            settings: CommandSettings::default(),
            validator: None,
        }
    }

    /// Declares an option.
    #[must_use]
    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the dispatch policy.
    #[must_use]
    pub const fn with_settings(mut self, settings: CommandSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets a custom validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn InvocationValidator>) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// All declarations for one command.
#[derive(Clone)]
pub struct CommandUnit {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) handler: Option<Arc<dyn CommandHandler>>,
    pub(super) options: Vec<OptionDescriptor>,
    pub(super) settings: Option<CommandSettings>,
    pub(super) validator: Option<Arc<dyn InvocationValidator>>,
    pub(super) default_permission: Option<DefaultPermission>,
    pub(super) contexts: Option<Vec<CommandContext>>,
    pub(super) integrations: Option<Vec<IntegrationType>>,
    pub(super) nsfw: Option<bool>,
    pub(super) sub_commands: Vec<SubCommandUnit>,
}

impl CommandUnit {
    /// Starts a command declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: None,
            options: Vec::new(),
            settings: None,
            validator: None,
            default_permission: None,
            contexts: None,
            integrations: None,
            nsfw: None,
            sub_commands: Vec::new(),
        }
    }

    /// Returns the declared command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the top-level handler.
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Declares an option on the top-level handler.
    #[must_use]
    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the command-level dispatch policy.
    #[must_use]
    pub const fn with_settings(mut self, settings: CommandSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets a custom validator on the top-level handler.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn InvocationValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the default permission requirement.
    #[must_use]
    pub const fn with_permissions(mut self, permission: DefaultPermission) -> Self {
        self.default_permission = Some(permission);
        self
    }

    /// Sets the allowed invocation contexts.
    #[must_use]
    pub fn with_contexts(mut self, contexts: impl IntoIterator<Item = CommandContext>) -> Self {
        self.contexts = Some(contexts.into_iter().collect());
        self
    }

    /// Sets the installation surfaces.
    #[must_use]
    pub fn with_integrations(
        mut self,
        integrations: impl IntoIterator<Item = IntegrationType>,
    ) -> Self {
        self.integrations = Some(integrations.into_iter().collect());
        self
    }

    /// Sets the NSFW flag.
    #[must_use]
    pub const fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = Some(nsfw);
        self
    }

    /// Declares a sub-command.
    #[must_use]
    pub fn with_sub_command(mut self, sub_command: SubCommandUnit) -> Self {
        self.sub_commands.push(sub_command);
        self
    }
}
