//! Command and sub-command definitions owned by the registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{CommandHandler, InvocationValidator, Permissions, ResolutionError, Snowflake};

/// Where a command may be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandContext {
    /// Inside a guild.
    Guild,
    /// In a direct message with the bot.
    BotDm,
    /// In a group or direct message not involving the bot.
    PrivateChannel,
}

impl CommandContext {
    /// All contexts.
    pub const ALL: [Self; 3] = [Self::Guild, Self::BotDm, Self::PrivateChannel];

    /// Returns the application-command wire code.
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::Guild => 0,
            Self::BotDm => 1,
            Self::PrivateChannel => 2,
        }
    }
}

/// Installation surface a command is available on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    /// Installed to a guild.
    GuildInstall,
    /// Installed to a user account.
    UserInstall,
}

impl IntegrationType {
    /// Returns the application-command wire code.
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::GuildInstall => 0,
            Self::UserInstall => 1,
        }
    }
}

/// Who may use a command before guild-specific overrides apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "permissions")]
pub enum DefaultPermission {
    /// Everyone.
    #[default]
    Everyone,
    /// Members holding all of the given permissions.
    Members(Permissions),
    /// Nobody except administrators and explicit overrides.
    Disabled,
}

impl DefaultPermission {
    /// Returns `true` unless the command is open to everyone.
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        !matches!(self, Self::Everyone)
    }

    /// Returns the `default_member_permissions` wire string.
    #[must_use]
    pub fn wire_value(self) -> Option<String> {
        match self {
            Self::Everyone => None,
            Self::Members(permissions) => Some(permissions.bits().to_string()),
            Self::Disabled => Some("0".to_owned()),
        }
    }
}

/// Per-handler dispatch policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSettings {
    /// Acknowledge with a deferred reply before converting arguments.
    #[serde(default)]
    pub defer: bool,
    /// Refuse the free-text path.
    #[serde(default)]
    pub text_disabled: bool,
}

impl CommandSettings {
    /// Enables auto-defer.
    #[must_use]
    pub const fn deferred(mut self) -> Self {
        self.defer = true;
        self
    }

    /// Disables the free-text path.
    #[must_use]
    pub const fn text_disabled(mut self) -> Self {
        self.text_disabled = true;
        self
    }
}

/// Identifies a handler by its command path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerKey {
    /// Lowercased command name.
    pub command: String,
    /// Lowercased sub-command name, `None` for the top-level handler.
    pub sub_command: Option<String>,
}

impl HandlerKey {
    /// Key of a command's top-level handler.
    #[must_use]
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            command: command.into().to_ascii_lowercase(),
            sub_command: None,
        }
    }

    /// Key of a sub-command handler.
    #[must_use]
    pub fn sub_command(command: impl Into<String>, sub_command: impl Into<String>) -> Self {
        Self {
            command: command.into().to_ascii_lowercase(),
            sub_command: Some(sub_command.into().to_ascii_lowercase()),
        }
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.command)?;
        if let Some(sub_command) = &self.sub_command {
            write!(formatter, " {sub_command}")?;
        }
        Ok(())
    }
}

/// A named sub-command nested under a command.
#[derive(Clone)]
pub struct SubCommandDefinition {
    /// Name local to the parent command.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Dispatch policy.
    pub settings: CommandSettings,
    pub(crate) handler: Arc<dyn CommandHandler>,
    pub(crate) validator: Option<Arc<dyn InvocationValidator>>,
}

impl SubCommandDefinition {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            description: description.into(),
            settings: CommandSettings::default(),
            handler,
            validator: None,
        }
    }
}

impl fmt::Debug for SubCommandDefinition {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SubCommandDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("settings", &self.settings)
            .field("has_validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

/// A registered command.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Lowercase unique name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Default permission requirement.
    pub default_permission: DefaultPermission,
    /// Contexts the command may be invoked in.
    pub contexts: Vec<CommandContext>,
    /// Installation surfaces the command is offered on.
    pub integrations: Vec<IntegrationType>,
    /// Age-restricted channels only.
    pub nsfw: bool,
    /// Dispatch policy of the top-level handler.
    pub settings: CommandSettings,
    pub(crate) handler: Option<Arc<dyn CommandHandler>>,
    pub(crate) validator: Option<Arc<dyn InvocationValidator>>,
    pub(crate) sub_commands: BTreeMap<String, SubCommandDefinition>,
    platform_id: OnceLock<Snowflake>,
}

impl CommandDefinition {
    pub(crate) fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            description: description.into(),
            default_permission: DefaultPermission::Everyone,
            contexts: vec![CommandContext::Guild],
            integrations: vec![IntegrationType::GuildInstall],
            nsfw: false,
            settings: CommandSettings::default(),
            handler: None,
            validator: None,
            sub_commands: BTreeMap::new(),
            platform_id: OnceLock::new(),
        }
    }

    /// Returns the platform-assigned id, absent until synchronized.
    #[must_use]
    pub fn platform_id(&self) -> Option<Snowflake> {
        self.platform_id.get().copied()
    }

    /// Stores the platform-assigned id.
    ///
    /// Returns the previously stored id when a different one was already
    /// assigned.
    pub(crate) fn assign_platform_id(&self, id: Snowflake) -> Result<(), Snowflake> {
        let stored = *self.platform_id.get_or_init(|| id);
        if stored == id { Ok(()) } else { Err(stored) }
    }

    /// Returns the sub-command map.
    #[must_use]
    pub const fn sub_commands(&self) -> &BTreeMap<String, SubCommandDefinition> {
        &self.sub_commands
    }

    /// Returns `true` when the command has sub-commands.
    #[must_use]
    pub fn has_sub_commands(&self) -> bool {
        !self.sub_commands.is_empty()
    }

    /// Returns `true` when a top-level handler is registered.
    #[must_use]
    pub const fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Returns `true` when the command may run in `context`.
    #[must_use]
    pub fn allows_context(&self, context: CommandContext) -> bool {
        self.contexts.contains(&context)
    }

    /// Resolves the handler for an optional sub-command name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the sub-command does not exist, or
    /// when none was named and the command has no top-level handler.
    pub fn resolve(&self, sub_command: Option<&str>) -> Result<ResolvedHandler<'_>, ResolutionError> {
        match sub_command {
            Some(name) => {
                let normalized = name.to_ascii_lowercase();
                let sub = self.sub_commands.get(&normalized).ok_or_else(|| {
                    ResolutionError::UnknownSubCommand {
                        command: self.name.clone(),
                        sub_command: normalized.clone(),
                    }
                })?;
                Ok(ResolvedHandler {
                    key: HandlerKey::sub_command(&self.name, normalized),
                    handler: &sub.handler,
                    validator: sub.validator.as_ref(),
                    settings: self.merged_settings(sub.settings),
                })
            }
            None => {
                let handler = self
                    .handler
                    .as_ref()
                    .ok_or_else(|| ResolutionError::MissingSubCommand(self.name.clone()))?;
                Ok(ResolvedHandler {
                    key: HandlerKey::command(&self.name),
                    handler,
                    validator: self.validator.as_ref(),
                    settings: self.settings,
                })
            }
        }
    }

    const fn merged_settings(&self, sub: CommandSettings) -> CommandSettings {
        CommandSettings {
            defer: self.settings.defer || sub.defer,
            text_disabled: self.settings.text_disabled || sub.text_disabled,
        }
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("default_permission", &self.default_permission)
            .field("contexts", &self.contexts)
            .field("integrations", &self.integrations)
            .field("nsfw", &self.nsfw)
            .field("settings", &self.settings)
            .field("platform_id", &self.platform_id())
            .field("sub_commands", &self.sub_commands)
            .field("has_handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

/// The handler selected for one invocation.
#[derive(Clone)]
pub struct ResolvedHandler<'a> {
    /// Command path of the handler.
    pub key: HandlerKey,
    /// Effective dispatch policy; command-level flags apply to every
    /// sub-command.
    pub settings: CommandSettings,
    handler: &'a Arc<dyn CommandHandler>,
    validator: Option<&'a Arc<dyn InvocationValidator>>,
}

impl<'a> ResolvedHandler<'a> {
    /// Returns the handler.
    #[must_use]
    pub const fn handler(&self) -> &'a Arc<dyn CommandHandler> {
        self.handler
    }

    /// Returns the custom validator, if any.
    #[must_use]
    pub const fn validator(&self) -> Option<&'a Arc<dyn InvocationValidator>> {
        self.validator
    }
}
