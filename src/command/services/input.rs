//! Dual-protocol input adapter.
//!
//! Structured interactions pass straight through; free-text messages are
//! bound to the target handler's option descriptors by position.

use crate::command::domain::{
    ArgumentBag, CommandDefinition, HandlerKey, RawValue, SlashInteraction, TextInvocation,
};
use crate::command::registry::CommandRegistry;

/// An invocation normalized from either wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalInvocation {
    /// Lowercased command name.
    pub command: String,
    /// Lowercased sub-command name, when one was named.
    pub sub_command: Option<String>,
    /// Raw arguments in wire order.
    pub arguments: ArgumentBag,
}

impl CanonicalInvocation {
    /// Normalizes a structured interaction.
    #[must_use]
    pub fn from_interaction(interaction: &SlashInteraction) -> Self {
        Self {
            command: interaction.command.to_ascii_lowercase(),
            sub_command: interaction
                .sub_command
                .as_deref()
                .map(str::to_ascii_lowercase),
            arguments: interaction
                .options
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    /// Binds parsed free text to `definition`.
    ///
    /// When the command has sub-commands and the first token names one, the
    /// token selects it. Remaining tokens map onto the handler's descriptors
    /// by position; a take-rest descriptor receives every token from its
    /// position joined by single spaces. Surplus tokens are dropped.
    #[must_use]
    pub fn from_text(
        invocation: TextInvocation,
        definition: &CommandDefinition,
        registry: &CommandRegistry,
    ) -> Self {
        let (command, tokens) = invocation.into_parts();
        let (sub_command, positional) = split_sub_command(definition, tokens);
        let key = sub_command.as_ref().map_or_else(
            || HandlerKey::command(&definition.name),
            |sub| HandlerKey::sub_command(&definition.name, sub),
        );

        let mut arguments = ArgumentBag::new();
        for (position, descriptor) in registry.descriptors(&key).iter().enumerate() {
            if descriptor.settings.take_rest {
                let rest = positional.get(position..).unwrap_or_default().join(" ");
                if !rest.is_empty() {
                    arguments.push(&descriptor.name, RawValue::Text(rest));
                }
                break;
            }
            let Some(token) = positional.get(position) else {
                break;
            };
            arguments.push(&descriptor.name, RawValue::text(token));
        }

        Self {
            command,
            sub_command,
            arguments,
        }
    }
}

fn split_sub_command(
    definition: &CommandDefinition,
    tokens: Vec<String>,
) -> (Option<String>, Vec<String>) {
    if !definition.has_sub_commands() {
        return (None, tokens);
    }
    let mut remaining = tokens.into_iter();
    let Some(first) = remaining.next() else {
        return (None, Vec::new());
    };
    let candidate = first.to_ascii_lowercase();
    if definition.sub_commands().contains_key(&candidate) {
        (Some(candidate), remaining.collect())
    } else {
        (None, std::iter::once(first).chain(remaining).collect())
    }
}
