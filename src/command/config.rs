//! Dispatch configuration.

use serde::Deserialize;
use std::time::Duration;

/// Tunables for the dispatch core.
///
/// # Examples
///
/// ```
/// use herald::command::config::DispatchConfig;
/// use std::time::Duration;
///
/// let config = DispatchConfig::default();
/// assert_eq!(config.activator, '?');
///
/// let custom = DispatchConfig::default()
///     .with_activator('!')
///     .with_caller_cooldown(Duration::from_secs(3));
/// assert_eq!(custom.activator, '!');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Character that prefixes free-text commands.
    pub activator: char,
    /// Window during which repeat free-text invocations from one caller are
    /// dropped.
    pub caller_cooldown: Duration,
    /// How long a guild's permission overrides stay cached.
    pub permission_ttl: Duration,
    /// Delay before a free-text "command not found" notice is retracted.
    pub not_found_retract_after: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            activator: '?',
            caller_cooldown: Duration::from_secs(1),
            permission_ttl: Duration::from_secs(5 * 60),
            not_found_retract_after: Duration::from_secs(5),
        }
    }
}

impl DispatchConfig {
    /// Configuration with cooldown and caching disabled, for tests.
    #[must_use]
    pub const fn uncached() -> Self {
        Self {
            activator: '?',
            caller_cooldown: Duration::ZERO,
            permission_ttl: Duration::ZERO,
            not_found_retract_after: Duration::from_secs(5),
        }
    }

    /// Sets the activator character.
    #[must_use]
    pub const fn with_activator(mut self, activator: char) -> Self {
        self.activator = activator;
        self
    }

    /// Sets the caller cooldown window.
    #[must_use]
    pub const fn with_caller_cooldown(mut self, cooldown: Duration) -> Self {
        self.caller_cooldown = cooldown;
        self
    }

    /// Sets the permission cache TTL.
    #[must_use]
    pub const fn with_permission_ttl(mut self, ttl: Duration) -> Self {
        self.permission_ttl = ttl;
        self
    }

    /// Sets the not-found retraction delay.
    #[must_use]
    pub const fn with_not_found_retract_after(mut self, delay: Duration) -> Self {
        self.not_found_retract_after = delay;
        self
    }
}
