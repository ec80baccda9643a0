//! Error types for parsing, resolution, and handler execution.

use std::sync::Arc;
use thiserror::Error;

/// Errors for free-text command parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TextParseError {
    /// Input was empty.
    #[error("command input cannot be empty")]
    EmptyInput,

    /// Input does not start with the activator character.
    #[error("commands must start with '{0}'")]
    MissingActivator(char),

    /// Nothing follows the activator.
    #[error("missing command name after the activator")]
    MissingCommandName,
}

/// A command or sub-command could not be resolved from the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// No command is registered under the name.
    #[error("command '{0}' was not found")]
    UnknownCommand(String),

    /// The command exists but has no such sub-command.
    #[error("sub-command '{sub_command}' of command '{command}' was not found")]
    UnknownSubCommand {
        /// Command name.
        command: String,
        /// Requested sub-command name.
        sub_command: String,
    },

    /// The command only has sub-commands and none was named.
    #[error("command '{0}' requires a sub-command")]
    MissingSubCommand(String),
}

/// Failure raised inside a command handler.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// The handler rejected its input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other handler failure.
    #[error("handler failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Wraps an arbitrary handler failure.
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
