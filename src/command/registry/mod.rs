//! Command registry: definitions, option descriptors, and the freeze step.
//!
//! The registry is built at startup through explicit registration calls or
//! declarative [`CommandUnit`]s, then frozen with [`CommandRegistry::lock`]
//! and shared read-only with the dispatcher. The only write accepted after
//! the freeze is the write-once platform id stored by synchronization.

mod error;
mod options;
mod payload;
mod unit;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::command::domain::{
    CommandContext, CommandDefinition, CommandHandler, CommandSettings, DefaultPermission,
    HandlerKey, IntegrationType, InvocationValidator, OptionDescriptor, Snowflake,
    SubCommandDefinition,
};

pub use error::{RegistrationError, RegistrationResult};
pub use options::OptionDescriptorRegistry;
pub use payload::{CommandPayload, OptionPayload};
pub use unit::{CommandUnit, SubCommandUnit};

/// Process-wide registry of commands.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDefinition>,
    options: OptionDescriptorRegistry,
    frozen: bool,
}

impl CommandRegistry {
    /// Creates an empty, unlocked registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a command definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateCommand`] when the lowercased
    /// name is taken, or [`RegistrationError::RegistryFrozen`] after
    /// [`CommandRegistry::lock`].
    pub fn register_command(
        &mut self,
        name: &str,
        description: impl Into<String>,
    ) -> RegistrationResult<()> {
        self.ensure_unlocked()?;
        let definition = CommandDefinition::new(name, description);
        if self.commands.contains_key(&definition.name) {
            return Err(RegistrationError::DuplicateCommand(definition.name));
        }
        debug!(command = %definition.name, "registered command");
        self.commands.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Sets the top-level handler of a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] when the command does
    /// not exist, or [`RegistrationError::RegistryFrozen`].
    pub fn set_handler(
        &mut self,
        command: &str,
        handler: Arc<dyn CommandHandler>,
    ) -> RegistrationResult<()> {
        self.command_mut(command)?.handler = Some(handler);
        Ok(())
    }

    /// Registers a sub-command under an existing command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::OrphanSubCommand`] when the parent is not
    /// registered, [`RegistrationError::DuplicateSubCommand`] when the name is
    /// taken, or [`RegistrationError::RegistryFrozen`].
    pub fn register_sub_command(
        &mut self,
        parent: &str,
        name: &str,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> RegistrationResult<()> {
        self.ensure_unlocked()?;
        let sub_command = SubCommandDefinition::new(name, description, handler);
        let parent_name = parent.to_ascii_lowercase();
        let definition = self.commands.get_mut(&parent_name).ok_or_else(|| {
            RegistrationError::OrphanSubCommand {
                parent: parent_name.clone(),
                sub_command: sub_command.name.clone(),
            }
        })?;
        if definition.sub_commands.contains_key(&sub_command.name) {
            return Err(RegistrationError::DuplicateSubCommand {
                parent: parent_name,
                sub_command: sub_command.name,
            });
        }
        debug!(command = %parent_name, sub_command = %sub_command.name, "registered sub-command");
        definition
            .sub_commands
            .insert(sub_command.name.clone(), sub_command);
        Ok(())
    }

    /// Declares an option on a registered handler.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] or
    /// [`RegistrationError::UnregisteredHandler`] when the target does not
    /// exist, [`RegistrationError::DuplicateOption`] when the name is taken,
    /// or [`RegistrationError::RegistryFrozen`].
    pub fn declare_option(
        &mut self,
        handler: &HandlerKey,
        option: OptionDescriptor,
    ) -> RegistrationResult<()> {
        self.ensure_unlocked()?;
        let definition = self
            .commands
            .get(&handler.command)
            .ok_or_else(|| RegistrationError::UnregisteredCommand(handler.command.clone()))?;
        if let Some(sub_command) = &handler.sub_command
            && !definition.sub_commands.contains_key(sub_command)
        {
            return Err(RegistrationError::UnregisteredHandler(handler.clone()));
        }
        self.options.declare_option(handler, option)
    }

    /// Sets the default permission requirement.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] or
    /// [`RegistrationError::RegistryFrozen`].
    pub fn set_permissions(
        &mut self,
        command: &str,
        permission: DefaultPermission,
    ) -> RegistrationResult<()> {
        self.command_mut(command)?.default_permission = permission;
        Ok(())
    }

    /// Sets the allowed invocation contexts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] or
    /// [`RegistrationError::RegistryFrozen`].
    pub fn set_contexts(
        &mut self,
        command: &str,
        contexts: impl IntoIterator<Item = CommandContext>,
    ) -> RegistrationResult<()> {
        let definition = self.command_mut(command)?;
        definition.contexts = contexts.into_iter().collect();
        definition.contexts.sort_unstable();
        definition.contexts.dedup();
        Ok(())
    }

    /// Sets the installation surfaces.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] or
    /// [`RegistrationError::RegistryFrozen`].
    pub fn set_integrations(
        &mut self,
        command: &str,
        integrations: impl IntoIterator<Item = IntegrationType>,
    ) -> RegistrationResult<()> {
        let definition = self.command_mut(command)?;
        definition.integrations = integrations.into_iter().collect();
        definition.integrations.sort_unstable();
        definition.integrations.dedup();
        Ok(())
    }

    /// Sets the NSFW flag.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] or
    /// [`RegistrationError::RegistryFrozen`].
    pub fn set_nsfw(&mut self, command: &str, nsfw: bool) -> RegistrationResult<()> {
        self.command_mut(command)?.nsfw = nsfw;
        Ok(())
    }

    /// Sets the dispatch policy of a handler.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`],
    /// [`RegistrationError::UnregisteredHandler`], or
    /// [`RegistrationError::RegistryFrozen`].
    pub fn set_settings(
        &mut self,
        handler: &HandlerKey,
        settings: CommandSettings,
    ) -> RegistrationResult<()> {
        let definition = self.command_mut(&handler.command)?;
        match &handler.sub_command {
            Some(name) => {
                definition
                    .sub_commands
                    .get_mut(name)
                    .ok_or_else(|| RegistrationError::UnregisteredHandler(handler.clone()))?
                    .settings = settings;
            }
            None => definition.settings = settings,
        }
        Ok(())
    }

    /// Attaches a custom validator to a handler.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`],
    /// [`RegistrationError::UnregisteredHandler`], or
    /// [`RegistrationError::RegistryFrozen`].
    pub fn set_validator(
        &mut self,
        handler: &HandlerKey,
        validator: Arc<dyn InvocationValidator>,
    ) -> RegistrationResult<()> {
        let definition = self.command_mut(&handler.command)?;
        match &handler.sub_command {
            Some(name) => {
                definition
                    .sub_commands
                    .get_mut(name)
                    .ok_or_else(|| RegistrationError::UnregisteredHandler(handler.clone()))?
                    .validator = Some(validator);
            }
            None => definition.validator = Some(validator),
        }
        Ok(())
    }

    /// Materializes a declarative unit: command, handler, sub-commands,
    /// options, then policy.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] raised by the underlying
    /// registration calls.
    pub fn register_unit(&mut self, unit: CommandUnit) -> RegistrationResult<()> {
        let CommandUnit {
            name,
            description,
            handler,
            options,
            settings,
            validator,
            default_permission,
            contexts,
            integrations,
            nsfw,
            sub_commands,
        } = unit;

        self.register_command(&name, description)?;
        let command_key = HandlerKey::command(&name);
        if let Some(top_level) = handler {
            self.set_handler(&name, top_level)?;
        }

        for sub_command in sub_commands {
            let sub_key = HandlerKey::sub_command(&name, &sub_command.name);
            self.register_sub_command(
                &name,
                &sub_command.name,
                sub_command.description,
                sub_command.handler,
            )?;
            for option in sub_command.options {
                self.declare_option(&sub_key, option)?;
            }
            self.set_settings(&sub_key, sub_command.settings)?;
            if let Some(sub_validator) = sub_command.validator {
                self.set_validator(&sub_key, sub_validator)?;
            }
        }

        for option in options {
            self.declare_option(&command_key, option)?;
        }
        if let Some(command_settings) = settings {
            self.set_settings(&command_key, command_settings)?;
        }
        if let Some(command_validator) = validator {
            self.set_validator(&command_key, command_validator)?;
        }
        if let Some(permission) = default_permission {
            self.set_permissions(&name, permission)?;
        }
        if let Some(allowed) = contexts {
            self.set_contexts(&name, allowed)?;
        }
        if let Some(surfaces) = integrations {
            self.set_integrations(&name, surfaces)?;
        }
        if let Some(flag) = nsfw {
            self.set_nsfw(&name, flag)?;
        }
        Ok(())
    }

    /// Freezes the registry. Calling it again is a no-op.
    ///
    /// On the first call every handler's declared option use is checked
    /// against its descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UndeclaredOption`] when a handler reads
    /// an option it never declared; the registry stays unlocked.
    pub fn lock(&mut self) -> RegistrationResult<()> {
        if self.frozen {
            return Ok(());
        }
        self.verify_consumed_options()?;
        self.frozen = true;
        info!(commands = self.commands.len(), "command registry locked");
        Ok(())
    }

    /// Returns `true` once [`CommandRegistry::lock`] succeeded.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.frozen
    }

    /// Looks up a command by name, case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(&name.to_ascii_lowercase())
    }

    /// Returns the read-only command map, ordered by name.
    #[must_use]
    pub const fn commands(&self) -> &BTreeMap<String, CommandDefinition> {
        &self.commands
    }

    /// Returns the number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when no command is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns a handler's option descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self, handler: &HandlerKey) -> &[OptionDescriptor] {
        self.options.descriptors(handler)
    }

    /// Returns the option descriptor registry.
    #[must_use]
    pub const fn options(&self) -> &OptionDescriptorRegistry {
        &self.options
    }

    /// Builds one synchronization payload per command.
    #[must_use]
    pub fn command_payloads(&self) -> Vec<CommandPayload> {
        self.commands
            .values()
            .map(|definition| CommandPayload::build(definition, &self.options))
            .collect()
    }

    /// Serializes every command into the platform's JSON array shape.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn commands_as_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.command_payloads())
    }

    /// Stores the platform-assigned id of a synchronized command.
    ///
    /// Allowed after the freeze; an id can be written once.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnregisteredCommand`] for unknown names or
    /// [`RegistrationError::PlatformIdConflict`] when a different id is
    /// already stored.
    pub fn assign_platform_id(&self, command: &str, id: Snowflake) -> RegistrationResult<()> {
        let definition = self
            .get(command)
            .ok_or_else(|| RegistrationError::UnregisteredCommand(command.to_ascii_lowercase()))?;
        definition
            .assign_platform_id(id)
            .map_err(|existing| RegistrationError::PlatformIdConflict {
                command: definition.name.clone(),
                existing,
            })
    }

    const fn ensure_unlocked(&self) -> RegistrationResult<()> {
        if self.frozen {
            Err(RegistrationError::RegistryFrozen)
        } else {
            Ok(())
        }
    }

    fn command_mut(&mut self, command: &str) -> RegistrationResult<&mut CommandDefinition> {
        self.ensure_unlocked()?;
        let name = command.to_ascii_lowercase();
        self.commands
            .get_mut(&name)
            .ok_or(RegistrationError::UnregisteredCommand(name))
    }

    fn verify_consumed_options(&self) -> RegistrationResult<()> {
        for definition in self.commands.values() {
            if let Some(handler) = &definition.handler {
                self.verify_handler(&HandlerKey::command(&definition.name), handler.as_ref())?;
            }
            for sub_command in definition.sub_commands.values() {
                self.verify_handler(
                    &HandlerKey::sub_command(&definition.name, &sub_command.name),
                    sub_command.handler.as_ref(),
                )?;
            }
        }
        Ok(())
    }

    fn verify_handler(
        &self,
        key: &HandlerKey,
        handler: &dyn CommandHandler,
    ) -> RegistrationResult<()> {
        let missing = handler
            .consumed_options()
            .iter()
            .find(|option| self.options.find(key, &option.to_ascii_lowercase()).is_none());
        missing.map_or(Ok(()), |option| {
            Err(RegistrationError::UndeclaredOption {
                handler: key.clone(),
                option: (*option).to_owned(),
            })
        })
    }
}
