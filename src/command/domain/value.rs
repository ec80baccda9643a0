//! Raw wire values and converted argument values.

use serde::{Deserialize, Serialize};

use super::{Attachment, Channel, Member, Mentionable, Role, User};

/// Raw tokens that always mean "no value supplied".
pub const UNSET_SENTINELS: [&str; 2] = [",x", "{null}"];

/// A value as delivered by one of the wire protocols, before conversion.
///
/// Free-text invocations only ever produce [`RawValue::Text`]; structured
/// interactions may carry pre-typed or pre-resolved values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RawValue {
    /// Unparsed text.
    Text(String),
    /// Pre-typed boolean.
    Boolean(bool),
    /// Pre-typed integer.
    Integer(i64),
    /// Pre-typed number.
    Number(f64),
    /// Pre-resolved user.
    User(User),
    /// Pre-resolved guild member.
    Member(Member),
    /// Pre-resolved role.
    Role(Role),
    /// Pre-resolved channel.
    Channel(Channel),
    /// Pre-resolved attachment.
    Attachment(Attachment),
}

impl RawValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` when the value is one of the "no value" sentinels.
    #[must_use]
    pub fn is_unset_sentinel(&self) -> bool {
        match self {
            Self::Text(text) => UNSET_SENTINELS.contains(&text.as_str()),
            _ => false,
        }
    }

    /// Returns the short kind name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::User(_) => "user",
            Self::Member(_) => "member",
            Self::Role(_) => "role",
            Self::Channel(_) => "channel",
            Self::Attachment(_) => "attachment",
        }
    }
}

/// A converted, strongly-typed argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ArgumentValue {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Number value.
    Number(f64),
    /// Text value.
    String(String),
    /// Resolved user.
    User(User),
    /// Resolved role.
    Role(Role),
    /// Resolved channel.
    Channel(Channel),
    /// Resolved role or user.
    Mentionable(Mentionable),
    /// Uploaded attachment.
    Attachment(Attachment),
}

/// Extracts a concrete Rust type from an [`ArgumentValue`].
pub trait FromArgument: Sized {
    /// Returns the typed value, or `None` when the variant does not match.
    fn from_argument(value: &ArgumentValue) -> Option<Self>;
}

impl FromArgument for bool {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl FromArgument for i64 {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Integer(number) => Some(*number),
            _ => None,
        }
    }
}

impl FromArgument for f64 {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl FromArgument for String {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::String(text) => Some(text.clone()),
            _ => None,
        }
    }
}

impl FromArgument for User {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::User(user) | ArgumentValue::Mentionable(Mentionable::User(user)) => {
                Some(user.clone())
            }
            _ => None,
        }
    }
}

impl FromArgument for Role {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Role(role) | ArgumentValue::Mentionable(Mentionable::Role(role)) => {
                Some(role.clone())
            }
            _ => None,
        }
    }
}

impl FromArgument for Channel {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Channel(channel) => Some(channel.clone()),
            _ => None,
        }
    }
}

impl FromArgument for Mentionable {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Mentionable(mentionable) => Some(mentionable.clone()),
            ArgumentValue::User(user) => Some(Mentionable::User(user.clone())),
            ArgumentValue::Role(role) => Some(Mentionable::Role(role.clone())),
            _ => None,
        }
    }
}

impl FromArgument for Attachment {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Attachment(attachment) => Some(attachment.clone()),
            _ => None,
        }
    }
}
