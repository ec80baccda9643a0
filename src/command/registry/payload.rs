//! Application-command payloads pushed to the host platform.

use serde::{Deserialize, Serialize};

use super::OptionDescriptorRegistry;
use crate::command::domain::{CommandDefinition, HandlerKey, OptionDescriptor};

const SUB_COMMAND_WIRE_CODE: u8 = 1;

/// Serializable view of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Command name.
    pub name: String,
    /// Command description.
    pub description: String,
    /// Options, or sub-commands as options of type 1.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionPayload>,
    /// Decimal permission bitmask, `None` for everyone.
    pub default_member_permissions: Option<String>,
    /// Allowed context wire codes.
    pub contexts: Vec<u8>,
    /// Installation surface wire codes.
    pub integration_types: Vec<u8>,
    /// Age-restricted flag.
    pub nsfw: bool,
}

/// Serializable view of one option or sub-command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPayload {
    /// Option type wire code.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Option name.
    pub name: String,
    /// Option description.
    pub description: String,
    /// Whether the platform requires a value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Nested options of a sub-command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionPayload>,
}

impl CommandPayload {
    pub(super) fn build(definition: &CommandDefinition, options: &OptionDescriptorRegistry) -> Self {
        let mut payload_options: Vec<OptionPayload> = options
            .descriptors(&HandlerKey::command(&definition.name))
            .iter()
            .map(OptionPayload::from_descriptor)
            .collect();
        payload_options.extend(definition.sub_commands().values().map(|sub_command| {
            OptionPayload {
                kind: SUB_COMMAND_WIRE_CODE,
                name: sub_command.name.clone(),
                description: non_empty_description(&sub_command.description, &sub_command.name),
                required: false,
                options: options
                    .descriptors(&HandlerKey::sub_command(&definition.name, &sub_command.name))
                    .iter()
                    .map(OptionPayload::from_descriptor)
                    .collect(),
            }
        }));

        Self {
            name: definition.name.clone(),
            description: non_empty_description(&definition.description, &definition.name),
            options: payload_options,
            default_member_permissions: definition.default_permission.wire_value(),
            contexts: definition
                .contexts
                .iter()
                .map(|context| context.wire_code())
                .collect(),
            integration_types: definition
                .integrations
                .iter()
                .map(|integration| integration.wire_code())
                .collect(),
            nsfw: definition.nsfw,
        }
    }
}

impl OptionPayload {
    fn from_descriptor(descriptor: &OptionDescriptor) -> Self {
        Self {
            kind: descriptor.option_type.wire_code(),
            name: descriptor.name.clone(),
            description: non_empty_description(&descriptor.description, &descriptor.name),
            required: descriptor.settings.required,
            options: Vec::new(),
        }
    }
}

fn non_empty_description(description: &str, fallback: &str) -> String {
    if description.trim().is_empty() {
        fallback.to_owned()
    } else {
        description.to_owned()
    }
}
