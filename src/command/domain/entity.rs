//! Platform entities that command arguments resolve to.

use serde::{Deserialize, Serialize};

use super::{Permissions, Snowflake};

/// A platform user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: Snowflake,
    /// Account name.
    pub name: String,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Creates a human user.
    #[must_use]
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bot: false,
        }
    }

    /// Marks the account as a bot.
    #[must_use]
    pub const fn as_bot(mut self) -> Self {
        self.bot = true;
        self
    }
}

/// A user's membership in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Guild the membership belongs to.
    pub guild_id: Snowflake,
    /// The member's user account.
    pub user: User,
    /// Roles held by the member.
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    /// Effective guild-level permissions.
    #[serde(default)]
    pub permissions: Permissions,
}

impl Member {
    /// Creates a member without roles or permissions.
    #[must_use]
    pub const fn new(guild_id: Snowflake, user: User) -> Self {
        Self {
            guild_id,
            user,
            roles: Vec::new(),
            permissions: Permissions::NONE,
        }
    }

    /// Sets the member's roles.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Snowflake>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Sets the member's effective permissions.
    #[must_use]
    pub const fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Returns `true` when the member holds the role.
    ///
    /// Every member implicitly holds the `@everyone` role, whose id equals
    /// the guild id.
    #[must_use]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        role_id == self.guild_id || self.roles.contains(&role_id)
    }
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: Snowflake,
    /// Guild owning the role.
    pub guild_id: Snowflake,
    /// Role name.
    pub name: String,
}

impl Role {
    /// Creates a role.
    #[must_use]
    pub fn new(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
        }
    }
}

/// A text, voice, or direct-message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel identifier.
    pub id: Snowflake,
    /// Owning guild; `None` for direct-message channels.
    pub guild_id: Option<Snowflake>,
    /// Channel name.
    pub name: String,
}

impl Channel {
    /// Creates a guild channel.
    #[must_use]
    pub fn in_guild(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: name.into(),
        }
    }

    /// Creates a direct-message channel.
    #[must_use]
    pub fn direct(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: None,
            name: name.into(),
        }
    }
}

/// A file uploaded alongside a structured interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment identifier.
    pub id: Snowflake,
    /// Original file name.
    pub filename: String,
    /// Download URL.
    pub url: String,
}

impl Attachment {
    /// Creates an attachment.
    #[must_use]
    pub fn new(id: Snowflake, filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            url: url.into(),
        }
    }
}

/// Either a role or a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Mentionable {
    /// A resolved user.
    User(User),
    /// A resolved role.
    Role(Role),
}

impl Mentionable {
    /// Returns the identifier of the wrapped entity.
    #[must_use]
    pub const fn id(&self) -> Snowflake {
        match self {
            Self::User(user) => user.id,
            Self::Role(role) => role.id,
        }
    }
}
