//! Value conversion: raw wire values into typed arguments.
//!
//! Entity lookups consult the host platform's cache first and fall back to
//! the directory; fetched entities are written back to the cache. A lookup
//! that finds nothing converts to `None`, the same as an absent argument.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tracing::debug;

use crate::command::domain::{
    ArgumentBag, ArgumentValue, Arguments, Channel, InvocationContext, Mentionable,
    OptionDescriptor, OptionType, RawValue, Role, Snowflake, User,
};
use crate::command::ports::{DirectoryError, DirectoryService, EntityCache};

/// Token that resolves a user option to the invoking caller.
pub const CALLER_TOKEN: &str = "^";

const USER_PREFIXES: &[&str] = &["@", "@!"];
const ROLE_PREFIXES: &[&str] = &["@&"];
const CHANNEL_PREFIXES: &[&str] = &["#"];
const MENTIONABLE_PREFIXES: &[&str] = &["@", "@!", "@&"];

#[expect(clippy::expect_used, reason = "the pattern is a compile-time literal")]
static MENTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(@!?|@&|#)(\d{17,20})>$").expect("invalid mention pattern")
});

/// Result type for conversions.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Malformed input or failed lookups. Missing entities are not errors.
#[derive(Debug, Clone, Error)]
pub enum ConversionError {
    /// A directory request failed.
    #[error("{option_type} lookup for {id} failed: {source}")]
    Lookup {
        /// Type being resolved.
        option_type: OptionType,
        /// Entity id being resolved.
        id: Snowflake,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },

    /// A structured value does not fit the declared option type.
    #[error("expected a {expected} value, received {found}")]
    TypeMismatch {
        /// Declared option type.
        expected: OptionType,
        /// Kind of the received value.
        found: &'static str,
    },
}

/// Converts raw values against a directory and an entity cache.
pub struct ValueConverter<D, E>
where
    D: DirectoryService,
    E: EntityCache,
{
    directory: Arc<D>,
    cache: Arc<E>,
}

impl<D, E> ValueConverter<D, E>
where
    D: DirectoryService,
    E: EntityCache,
{
    /// Creates a converter.
    #[must_use]
    pub const fn new(directory: Arc<D>, cache: Arc<E>) -> Self {
        Self { directory, cache }
    }

    /// Converts every bag entry that has a descriptor.
    ///
    /// Entries without a descriptor are skipped; entries that convert to
    /// nothing are left out of the result.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] raised.
    pub async fn convert_all(
        &self,
        context: &InvocationContext,
        bag: &ArgumentBag,
        descriptors: &[OptionDescriptor],
    ) -> ConversionResult<Arguments> {
        let mut arguments = Arguments::new();
        for (name, raw) in bag.iter() {
            let Some(descriptor) = descriptors.iter().find(|descriptor| descriptor.name == name)
            else {
                debug!(option = name, "skipping argument without a descriptor");
                continue;
            };
            if let Some(value) = self.convert(context, raw, descriptor.option_type).await? {
                arguments.insert(name, value);
            }
        }
        Ok(arguments)
    }

    /// Converts one raw value into `option_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Lookup`] when a directory request fails and
    /// [`ConversionError::TypeMismatch`] for structured values of the wrong
    /// type.
    pub async fn convert(
        &self,
        context: &InvocationContext,
        raw: &RawValue,
        option_type: OptionType,
    ) -> ConversionResult<Option<ArgumentValue>> {
        if raw.is_unset_sentinel() {
            return Ok(None);
        }
        match raw {
            RawValue::Text(text) => self.convert_text(context, text, option_type).await,
            resolved => convert_resolved(resolved, option_type),
        }
    }

    async fn convert_text(
        &self,
        context: &InvocationContext,
        text: &str,
        option_type: OptionType,
    ) -> ConversionResult<Option<ArgumentValue>> {
        let value = match option_type {
            OptionType::Boolean => Some(ArgumentValue::Boolean(parse_boolean(text))),
            OptionType::Integer => text.trim().parse::<i64>().ok().map(ArgumentValue::Integer),
            OptionType::Number => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(ArgumentValue::Number),
            OptionType::String => Some(ArgumentValue::String(text.to_owned())),
            OptionType::User => self
                .user_from_text(context, text)
                .await?
                .map(ArgumentValue::User),
            OptionType::Channel => {
                let Some(id) = extract_id(text, CHANNEL_PREFIXES) else {
                    return Ok(None);
                };
                self.resolve_channel(context.guild_id, id)
                    .await?
                    .map(ArgumentValue::Channel)
            }
            OptionType::Role => {
                let Some(id) = extract_id(text, ROLE_PREFIXES) else {
                    return Ok(None);
                };
                self.resolve_role(context.guild_id, id)
                    .await?
                    .map(ArgumentValue::Role)
            }
            OptionType::Mentionable => {
                let Some(id) = extract_id(text, MENTIONABLE_PREFIXES) else {
                    return Ok(None);
                };
                self.resolve_mentionable(context.guild_id, id)
                    .await?
                    .map(ArgumentValue::Mentionable)
            }
            OptionType::Attachment => None,
        };
        Ok(value)
    }

    async fn user_from_text(
        &self,
        context: &InvocationContext,
        text: &str,
    ) -> ConversionResult<Option<User>> {
        if text.trim() == CALLER_TOKEN {
            return Ok(Some(context.caller.clone()));
        }
        let Some(id) = extract_id(text, USER_PREFIXES) else {
            return Ok(None);
        };
        self.resolve_user(id).await
    }

    async fn resolve_user(&self, id: Snowflake) -> ConversionResult<Option<User>> {
        if let Some(user) = self.cache.user(id) {
            return Ok(Some(user));
        }
        let fetched = self
            .directory
            .fetch_user(id)
            .await
            .map_err(|source| lookup_error(OptionType::User, id, source))?;
        if let Some(user) = &fetched {
            self.cache.insert_user(user.clone());
        }
        Ok(fetched)
    }

    async fn resolve_channel(
        &self,
        guild_id: Option<Snowflake>,
        id: Snowflake,
    ) -> ConversionResult<Option<Channel>> {
        if let Some(channel) = self.cache.channel(id) {
            return Ok((channel.guild_id == guild_id).then_some(channel));
        }
        let Some(guild) = guild_id else {
            return Ok(None);
        };
        if let Some(channel) = self.cache.guild_channel(guild, id) {
            return Ok(Some(channel));
        }
        let fetched = self
            .directory
            .fetch_channel(guild, id)
            .await
            .map_err(|source| lookup_error(OptionType::Channel, id, source))?;
        if let Some(channel) = &fetched {
            self.cache.insert_channel(channel.clone());
        }
        Ok(fetched.filter(|channel| channel.guild_id == Some(guild)))
    }

    async fn resolve_role(
        &self,
        guild_id: Option<Snowflake>,
        id: Snowflake,
    ) -> ConversionResult<Option<Role>> {
        let Some(guild) = guild_id else {
            return Ok(None);
        };
        if let Some(role) = self.cache.role(guild, id) {
            return Ok(Some(role));
        }
        let fetched = self
            .directory
            .fetch_role(guild, id)
            .await
            .map_err(|source| lookup_error(OptionType::Role, id, source))?;
        if let Some(role) = &fetched {
            self.cache.insert_role(role.clone());
        }
        Ok(fetched)
    }

    async fn resolve_mentionable(
        &self,
        guild_id: Option<Snowflake>,
        id: Snowflake,
    ) -> ConversionResult<Option<Mentionable>> {
        if let Some(role) = self.resolve_role(guild_id, id).await? {
            return Ok(Some(Mentionable::Role(role)));
        }
        if let Some(user) = self.cache.user(id) {
            return Ok(Some(Mentionable::User(user)));
        }
        if let Some(guild) = guild_id {
            let member = self
                .directory
                .fetch_guild_member(guild, id)
                .await
                .map_err(|source| lookup_error(OptionType::Mentionable, id, source))?;
            if let Some(found) = member {
                let user = found.user.clone();
                self.cache.insert_member(found);
                return Ok(Some(Mentionable::User(user)));
            }
        }
        Ok(self.resolve_user(id).await?.map(Mentionable::User))
    }
}

/// Parses a free-text boolean: `1`, `y`, and `true` (any case) are `true`,
/// everything else is `false`.
#[must_use]
pub fn parse_boolean(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "y" | "true")
}

/// Extracts an entity id from a bare snowflake or a mention whose prefix is
/// one of `prefixes`.
#[must_use]
pub fn extract_id(raw: &str, prefixes: &[&str]) -> Option<Snowflake> {
    let trimmed = raw.trim();
    if let Some(id) = Snowflake::parse(trimmed) {
        return Some(id);
    }
    let captures = MENTION_PATTERN.captures(trimmed)?;
    let prefix = captures.get(1)?.as_str();
    if !prefixes.contains(&prefix) {
        return None;
    }
    Snowflake::parse(captures.get(2)?.as_str())
}

const fn lookup_error(option_type: OptionType, id: Snowflake, source: DirectoryError) -> ConversionError {
    ConversionError::Lookup {
        option_type,
        id,
        source,
    }
}

fn convert_resolved(
    raw: &RawValue,
    option_type: OptionType,
) -> ConversionResult<Option<ArgumentValue>> {
    let value = match (option_type, raw) {
        (OptionType::Boolean, RawValue::Boolean(flag)) => ArgumentValue::Boolean(*flag),
        (OptionType::Integer, RawValue::Integer(number)) => ArgumentValue::Integer(*number),
        (OptionType::Number, RawValue::Number(number)) => ArgumentValue::Number(*number),
        (OptionType::Number, RawValue::Integer(number)) => {
            #[expect(
                clippy::cast_precision_loss,
                reason = "integer arguments widen to numbers the way the platform does"
            )]
            let widened = *number as f64;
            ArgumentValue::Number(widened)
        }
        (OptionType::String, RawValue::Boolean(flag)) => ArgumentValue::String(flag.to_string()),
        (OptionType::String, RawValue::Integer(number)) => {
            ArgumentValue::String(number.to_string())
        }
        (OptionType::String, RawValue::Number(number)) => {
            ArgumentValue::String(number.to_string())
        }
        (OptionType::User, RawValue::User(user)) => ArgumentValue::User(user.clone()),
        (OptionType::User, RawValue::Member(member)) => ArgumentValue::User(member.user.clone()),
        (OptionType::Role, RawValue::Role(role)) => ArgumentValue::Role(role.clone()),
        (OptionType::Channel, RawValue::Channel(channel)) => {
            ArgumentValue::Channel(channel.clone())
        }
        (OptionType::Mentionable, RawValue::User(user)) => {
            ArgumentValue::Mentionable(Mentionable::User(user.clone()))
        }
        (OptionType::Mentionable, RawValue::Member(member)) => {
            ArgumentValue::Mentionable(Mentionable::User(member.user.clone()))
        }
        (OptionType::Mentionable, RawValue::Role(role)) => {
            ArgumentValue::Mentionable(Mentionable::Role(role.clone()))
        }
        (OptionType::Attachment, RawValue::Attachment(attachment)) => {
            ArgumentValue::Attachment(attachment.clone())
        }
        (expected, other) => {
            return Err(ConversionError::TypeMismatch {
                expected,
                found: other.kind(),
            });
        }
    };
    Ok(Some(value))
}
