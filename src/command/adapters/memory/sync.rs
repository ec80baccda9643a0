//! In-memory command synchronizer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::command::domain::Snowflake;
use crate::command::ports::{CommandSynchronizer, SyncError, SyncResult, SyncedCommand};
use crate::command::registry::CommandPayload;

/// Synchronizer that assigns sequential ids and keeps the last pushed
/// payloads. A command keeps its id across pushes.
#[derive(Debug, Clone)]
pub struct InMemoryCommandSynchronizer {
    state: Arc<Mutex<SyncState>>,
}

#[derive(Debug)]
struct SyncState {
    next_id: u64,
    ids: HashMap<String, Snowflake>,
    last_push: Vec<CommandPayload>,
}

impl InMemoryCommandSynchronizer {
    /// Creates a synchronizer whose first assigned id is `first_id`.
    #[must_use]
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SyncState {
                next_id: first_id,
                ids: HashMap::new(),
                last_push: Vec::new(),
            })),
        }
    }

    /// Returns the payloads of the most recent push.
    #[must_use]
    pub fn last_push(&self) -> Vec<CommandPayload> {
        self.state
            .lock()
            .map(|state| state.last_push.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryCommandSynchronizer {
    fn default() -> Self {
        Self::starting_at(1_000_000_000_000_000_000)
    }
}

#[async_trait]
impl CommandSynchronizer for InMemoryCommandSynchronizer {
    async fn push(&self, commands: &[CommandPayload]) -> SyncResult<Vec<SyncedCommand>> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| SyncError::request(std::io::Error::other(err.to_string())))?;
        let mut synced = Vec::with_capacity(commands.len());
        for payload in commands {
            let next = Snowflake::new(state.next_id);
            let assigned = *state.ids.entry(payload.name.clone()).or_insert(next);
            if assigned == next {
                state.next_id = state.next_id.saturating_add(1);
            }
            synced.push(SyncedCommand::new(payload.name.clone(), assigned));
        }
        state.last_push = commands.to_vec();
        Ok(synced)
    }
}
