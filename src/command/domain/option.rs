//! Option descriptors: the named arguments a handler accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// `true` / `false`.
    Boolean,
    /// Signed integer.
    Integer,
    /// Floating-point number.
    Number,
    /// Free-form text.
    String,
    /// A platform user.
    User,
    /// A guild role.
    Role,
    /// A channel.
    Channel,
    /// A role or a user.
    Mentionable,
    /// An uploaded file (structured interactions only).
    Attachment,
}

impl OptionType {
    /// Returns the application-command wire code for the type.
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::String => 3,
            Self::Integer => 4,
            Self::Boolean => 5,
            Self::User => 6,
            Self::Channel => 7,
            Self::Role => 8,
            Self::Mentionable => 9,
            Self::Number => 10,
            Self::Attachment => 11,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::User => "user",
            Self::Role => "role",
            Self::Channel => "channel",
            Self::Mentionable => "mentionable",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Per-option flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSettings {
    /// The platform requires a value for the option.
    #[serde(default)]
    pub required: bool,
    /// On the free-text path, the option swallows every remaining token.
    #[serde(default)]
    pub take_rest: bool,
}

impl OptionSettings {
    /// An optional option.
    pub const OPTIONAL: Self = Self {
        required: false,
        take_rest: false,
    };

    /// A required option.
    pub const REQUIRED: Self = Self {
        required: true,
        take_rest: false,
    };

    /// Marks the option as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as consuming all remaining free-text tokens.
    #[must_use]
    pub const fn take_rest(mut self) -> Self {
        self.take_rest = true;
        self
    }
}

/// A named argument accepted by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Option name, unique within the owning handler.
    pub name: String,
    /// Semantic type the raw value converts to.
    pub option_type: OptionType,
    /// Human-readable description pushed to the platform.
    #[serde(default)]
    pub description: String,
    /// Flags.
    #[serde(default)]
    pub settings: OptionSettings,
}

impl OptionDescriptor {
    /// Creates an optional descriptor. The name is lowercased.
    #[must_use]
    pub fn new(name: impl Into<String>, option_type: OptionType) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            option_type,
            description: String::new(),
            settings: OptionSettings::OPTIONAL,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replaces the settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: OptionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Marks the option as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.settings.required = true;
        self
    }

    /// Marks the option as consuming all remaining free-text tokens.
    #[must_use]
    pub const fn take_rest(mut self) -> Self {
        self.settings.take_rest = true;
        self
    }
}
