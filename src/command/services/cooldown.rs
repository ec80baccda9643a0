//! Caller-wide cooldown for free-text invocations.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::command::domain::Snowflake;

const PRUNE_THRESHOLD: usize = 1024;

/// Drops repeat invocations from one caller inside a window, whatever the
/// command.
#[derive(Debug)]
pub struct CallerCooldown<C>
where
    C: Clock + Send + Sync,
{
    window: TimeDelta,
    clock: Arc<C>,
    last_accepted: Mutex<HashMap<Snowflake, DateTime<Utc>>>,
}

impl<C> CallerCooldown<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a cooldown with the given window. A zero window accepts
    /// everything.
    #[must_use]
    pub fn new(window: Duration, clock: Arc<C>) -> Self {
        Self {
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX),
            clock,
            last_accepted: Mutex::new(HashMap::new()),
        }
    }

    /// Records an invocation by `caller`.
    ///
    /// Returns `false` when the caller's previous accepted invocation is
    /// still inside the window; the window is not extended in that case.
    #[must_use]
    pub fn try_acquire(&self, caller: Snowflake) -> bool {
        if self.window.is_zero() {
            return true;
        }
        let now = self.clock.utc();
        let Ok(mut accepted) = self.last_accepted.lock() else {
            return true;
        };
        if accepted
            .get(&caller)
            .is_some_and(|previous| self.is_within_window(*previous, now))
        {
            return false;
        }
        if accepted.len() >= PRUNE_THRESHOLD {
            accepted.retain(|_, previous| self.is_within_window(*previous, now));
        }
        accepted.insert(caller, now);
        true
    }

    fn is_within_window(&self, previous: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        previous
            .checked_add_signed(self.window)
            .is_none_or(|expires| now < expires)
    }
}
