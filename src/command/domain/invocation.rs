//! Inbound platform events and the per-invocation context handed to handlers.

use serde::{Deserialize, Serialize};

use super::{CommandContext, Member, RawValue, Snowflake, User};

/// Wire protocol an invocation arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationSource {
    /// Structured slash-style interaction.
    Interaction,
    /// Free-text chat message.
    Text,
}

/// A structured interaction with arguments already separated by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlashInteraction {
    /// Interaction identifier.
    pub id: Snowflake,
    /// Invoked command name.
    pub command: String,
    /// Invoked sub-command name, when the command has sub-commands.
    #[serde(default)]
    pub sub_command: Option<String>,
    /// Named option values.
    #[serde(default)]
    pub options: Vec<(String, RawValue)>,
    /// Invoking user.
    pub caller: User,
    /// Invoking member when inside a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Guild the interaction happened in.
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Channel the interaction happened in.
    pub channel_id: Snowflake,
}

impl SlashInteraction {
    /// Creates an interaction without options.
    #[must_use]
    pub fn new(
        id: Snowflake,
        command: impl Into<String>,
        caller: User,
        channel_id: Snowflake,
    ) -> Self {
        Self {
            id,
            command: command.into(),
            sub_command: None,
            options: Vec::new(),
            caller,
            member: None,
            guild_id: None,
            channel_id,
        }
    }

    /// Sets the invoked sub-command.
    #[must_use]
    pub fn with_sub_command(mut self, sub_command: impl Into<String>) -> Self {
        self.sub_command = Some(sub_command.into());
        self
    }

    /// Adds an option value.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.options.push((name.into(), value));
        self
    }

    /// Places the interaction inside a guild on behalf of `member`.
    #[must_use]
    pub fn in_guild(mut self, member: Member) -> Self {
        self.guild_id = Some(member.guild_id);
        self.member = Some(member);
        self
    }
}

/// A free-text chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    /// Message identifier.
    pub id: Snowflake,
    /// Message body.
    pub content: String,
    /// Message author.
    pub author: User,
    /// Author's membership when inside a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Guild the message was posted in.
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Channel the message was posted in.
    pub channel_id: Snowflake,
}

impl TextMessage {
    /// Creates a direct message.
    #[must_use]
    pub fn new(
        id: Snowflake,
        content: impl Into<String>,
        author: User,
        channel_id: Snowflake,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            author,
            member: None,
            guild_id: None,
            channel_id,
        }
    }

    /// Places the message inside a guild on behalf of `member`.
    #[must_use]
    pub fn in_guild(mut self, member: Member) -> Self {
        self.guild_id = Some(member.guild_id);
        self.member = Some(member);
        self
    }
}

/// An inbound platform event routed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "event")]
pub enum PlatformEvent {
    /// Structured interaction.
    Interaction(SlashInteraction),
    /// Chat message.
    Message(TextMessage),
}

/// Caller, guild, and channel of one invocation.
///
/// Handlers pass it to the presentation layer when replying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Interaction or message identifier.
    pub event_id: Snowflake,
    /// Wire protocol the invocation used.
    pub source: InvocationSource,
    /// Invoking user.
    pub caller: User,
    /// Invoking member when inside a guild.
    pub member: Option<Member>,
    /// Guild of the invocation.
    pub guild_id: Option<Snowflake>,
    /// Channel of the invocation.
    pub channel_id: Snowflake,
}

impl InvocationContext {
    /// Builds the context of a structured interaction.
    #[must_use]
    pub fn from_interaction(interaction: &SlashInteraction) -> Self {
        Self {
            event_id: interaction.id,
            source: InvocationSource::Interaction,
            caller: interaction.caller.clone(),
            member: interaction.member.clone(),
            guild_id: interaction.guild_id,
            channel_id: interaction.channel_id,
        }
    }

    /// Builds the context of a chat message.
    #[must_use]
    pub fn from_message(message: &TextMessage) -> Self {
        Self {
            event_id: message.id,
            source: InvocationSource::Text,
            caller: message.author.clone(),
            member: message.member.clone(),
            guild_id: message.guild_id,
            channel_id: message.channel_id,
        }
    }

    /// Builds the context of either event shape.
    #[must_use]
    pub fn from_event(event: &PlatformEvent) -> Self {
        match event {
            PlatformEvent::Interaction(interaction) => Self::from_interaction(interaction),
            PlatformEvent::Message(message) => Self::from_message(message),
        }
    }

    /// Returns the invocation context kind used for command restrictions.
    #[must_use]
    pub const fn command_context(&self) -> CommandContext {
        if self.guild_id.is_some() {
            CommandContext::Guild
        } else {
            CommandContext::BotDm
        }
    }

    /// Returns `true` for free-text invocations.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.source == InvocationSource::Text
    }
}
