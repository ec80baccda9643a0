//! Recording responder.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::command::domain::{InvocationContext, Snowflake};
use crate::command::ports::{Notice, Responder, ResponderError, ResponderResult};

/// Responder that records every deferral and notice instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingResponder {
    state: Arc<Mutex<RecordedReplies>>,
}

/// Replies captured by a [`RecordingResponder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedReplies {
    /// Event ids that were deferred, in order.
    pub deferred: Vec<Snowflake>,
    /// Notices sent, in order, with the event id they answered.
    pub notices: Vec<(Snowflake, Notice)>,
}

impl RecordingResponder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything recorded.
    #[must_use]
    pub fn replies(&self) -> RecordedReplies {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    /// Returns the notices sent so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.replies()
            .notices
            .into_iter()
            .map(|(_, notice)| notice)
            .collect()
    }

    fn record(&self, apply: impl FnOnce(&mut RecordedReplies)) -> ResponderResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| ResponderError::delivery(std::io::Error::other(err.to_string())))?;
        apply(&mut state);
        Ok(())
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn defer(&self, context: &InvocationContext) -> ResponderResult<()> {
        self.record(|state| state.deferred.push(context.event_id))
    }

    async fn notify(&self, context: &InvocationContext, notice: Notice) -> ResponderResult<()> {
        self.record(|state| state.notices.push((context.event_id, notice)))
    }
}
