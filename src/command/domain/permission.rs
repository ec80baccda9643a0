//! Permission bitmasks and per-guild command permission overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Snowflake;

/// Guild permission bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u64);

impl Permissions {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Kick members.
    pub const KICK_MEMBERS: Self = Self(1 << 1);
    /// Ban members.
    pub const BAN_MEMBERS: Self = Self(1 << 2);
    /// Full administrator access; bypasses every override.
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    /// Manage guild settings.
    pub const MANAGE_GUILD: Self = Self(1 << 5);
    /// Delete and pin other members' messages.
    pub const MANAGE_MESSAGES: Self = Self(1 << 13);
    /// Time out members.
    pub const MODERATE_MEMBERS: Self = Self(1 << 40);

    /// Wraps a raw bitmask.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bitmask.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` when the administrator bit is set.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }
}

/// Target kind of a command permission override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    /// Matches members holding the role. The guild id denotes `@everyone`.
    Role,
    /// Matches one user.
    User,
    /// Matches invocations inside one channel.
    Channel,
}

/// A single permission override attached to a synchronized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionOverride {
    /// Role, user, or channel the override targets.
    pub id: Snowflake,
    /// Target kind.
    pub kind: OverrideKind,
    /// Whether matching callers are granted (`true`) or refused.
    pub permission: bool,
}

impl PermissionOverride {
    /// Creates an override.
    #[must_use]
    pub const fn new(id: Snowflake, kind: OverrideKind, permission: bool) -> Self {
        Self {
            id,
            kind,
            permission,
        }
    }

    /// Creates a granting role override.
    #[must_use]
    pub const fn allow_role(id: Snowflake) -> Self {
        Self::new(id, OverrideKind::Role, true)
    }

    /// Creates a granting user override.
    #[must_use]
    pub const fn allow_user(id: Snowflake) -> Self {
        Self::new(id, OverrideKind::User, true)
    }

    /// Creates a granting channel override.
    #[must_use]
    pub const fn allow_channel(id: Snowflake) -> Self {
        Self::new(id, OverrideKind::Channel, true)
    }
}

/// Every command permission override configured in one guild, keyed by the
/// platform-assigned command id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildCommandPermissions {
    overrides: HashMap<Snowflake, Vec<PermissionOverride>>,
}

impl GuildCommandPermissions {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds overrides for a command.
    #[must_use]
    pub fn with_command(
        mut self,
        command_id: Snowflake,
        overrides: impl IntoIterator<Item = PermissionOverride>,
    ) -> Self {
        self.overrides
            .entry(command_id)
            .or_default()
            .extend(overrides);
        self
    }

    /// Returns the overrides configured for a command.
    #[must_use]
    pub fn for_command(&self, command_id: Snowflake) -> &[PermissionOverride] {
        self.overrides
            .get(&command_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the number of commands carrying overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Returns `true` when no command carries overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
