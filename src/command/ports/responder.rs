//! Responder port used by the dispatcher for canonical notices.
//!
//! Handlers reply through the presentation layer directly; the dispatcher only
//! needs deferred acknowledgements and a few canned notices.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::command::domain::InvocationContext;

/// Result type for responder operations.
pub type ResponderResult<T> = Result<T, ResponderError>;

/// Canonical notices emitted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The command or sub-command does not exist.
    CommandNotFound,
    /// Conversion or the handler failed.
    UnknownError,
    /// A structured interaction was refused by a context or validator gate.
    Denied,
}

/// A notice and how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// What happened.
    pub kind: NoticeKind,
    /// Visible only to the caller.
    pub ephemeral: bool,
    /// Delete the notice after this delay.
    pub retract_after: Option<Duration>,
}

impl Notice {
    /// Creates a persistent, public notice.
    #[must_use]
    pub const fn new(kind: NoticeKind) -> Self {
        Self {
            kind,
            ephemeral: false,
            retract_after: None,
        }
    }

    /// Makes the notice visible only to the caller.
    #[must_use]
    pub const fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Retracts the notice after `delay`.
    #[must_use]
    pub const fn retracted_after(mut self, delay: Duration) -> Self {
        self.retract_after = Some(delay);
        self
    }
}

/// Sends acknowledgements and notices back to the caller.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Acknowledges the invocation so the reply may arrive later.
    async fn defer(&self, context: &InvocationContext) -> ResponderResult<()>;

    /// Sends a canonical notice.
    async fn notify(&self, context: &InvocationContext, notice: Notice) -> ResponderResult<()>;
}

/// Errors returned by responder adapters.
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    /// The platform's reply window for the interaction has closed.
    #[error("reply window expired")]
    ReplyWindowExpired,

    /// Any other delivery failure.
    #[error("reply delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl ResponderError {
    /// Wraps a delivery failure.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
