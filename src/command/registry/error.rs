//! Registration errors. All of them are fatal at startup.

use thiserror::Error;

use crate::command::domain::{HandlerKey, Snowflake};

/// Result type for registry operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Errors raised while building the command registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// A command with the same name already exists.
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    /// The handler already declares an option with the same name.
    #[error("option '{option}' is already declared on '{handler}'")]
    DuplicateOption {
        /// Handler path.
        handler: HandlerKey,
        /// Option name.
        option: String,
    },

    /// A sub-command was registered against a missing parent.
    #[error("sub-command '{sub_command}' has no registered parent command '{parent}'")]
    OrphanSubCommand {
        /// Parent command name.
        parent: String,
        /// Sub-command name.
        sub_command: String,
    },

    /// The parent already has a sub-command with the same name.
    #[error("sub-command '{sub_command}' is already registered on '{parent}'")]
    DuplicateSubCommand {
        /// Parent command name.
        parent: String,
        /// Sub-command name.
        sub_command: String,
    },

    /// A policy or option call targeted a command that does not exist yet.
    #[error("command '{0}' is not registered")]
    UnregisteredCommand(String),

    /// An option was declared against a handler path that does not exist.
    #[error("no handler is registered at '{0}'")]
    UnregisteredHandler(HandlerKey),

    /// A handler reads an option it never declared.
    #[error("handler '{handler}' reads undeclared option '{option}'")]
    UndeclaredOption {
        /// Handler path.
        handler: HandlerKey,
        /// Option name.
        option: String,
    },

    /// The registry was locked.
    #[error("the command registry is frozen")]
    RegistryFrozen,

    /// Synchronization returned a different id for an already synchronized
    /// command.
    #[error("command '{command}' already has platform id {existing}")]
    PlatformIdConflict {
        /// Command name.
        command: String,
        /// Id stored on the definition.
        existing: Snowflake,
    },
}
