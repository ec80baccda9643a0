//! Platform entity identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of decimal digits in a platform snowflake.
pub const SNOWFLAKE_MIN_DIGITS: usize = 17;

/// Maximum number of decimal digits in a platform snowflake.
pub const SNOWFLAKE_MAX_DIGITS: usize = 20;

/// Opaque numeric identifier used by the host platform for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Wraps a raw numeric identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the wrapped numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parses a bare snowflake token.
    ///
    /// Only ASCII digit strings of platform snowflake length are accepted;
    /// anything else yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let length = raw.len();
        if !(SNOWFLAKE_MIN_DIGITS..=SNOWFLAKE_MAX_DIGITS).contains(&length)
            || !raw.bytes().all(|byte| byte.is_ascii_digit())
        {
            return None;
        }
        raw.parse::<u64>().ok().map(Self)
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
