//! Handler and validator contracts registered against commands.

use async_trait::async_trait;

use super::{ArgumentBag, Arguments, HandlerError, InvocationContext};

/// Result type for handler execution.
pub type HandlerResult = Result<(), HandlerError>;

/// Code run when a command or sub-command is invoked.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command with converted arguments.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the command fails; the dispatcher logs
    /// it and replies with a generic error notice.
    async fn handle(&self, context: &InvocationContext, arguments: &Arguments) -> HandlerResult;

    /// Names of the options the handler reads.
    ///
    /// Registration fails when any of them has no descriptor.
    fn consumed_options(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Custom gate evaluated after permission checks and before conversion.
#[async_trait]
pub trait InvocationValidator: Send + Sync {
    /// Returns `false` to silently refuse the invocation.
    async fn validate(&self, context: &InvocationContext, arguments: &ArgumentBag) -> bool;
}
