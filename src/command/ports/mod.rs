//! Port trait definitions for the command subsystem.
//!
//! Ports define what the dispatch core needs from the host platform. Adapters
//! implement them; [`crate::command::adapters::memory`] provides in-memory
//! versions for tests.

pub mod directory;
pub mod permissions;
pub mod responder;
pub mod sync;

pub use directory::{DirectoryError, DirectoryResult, DirectoryService, EntityCache};
#[cfg(test)]
pub use directory::MockDirectoryService;
pub use permissions::{PermissionOverrideSource, PermissionSourceError, PermissionSourceResult};
pub use responder::{Notice, NoticeKind, Responder, ResponderError, ResponderResult};
pub use sync::{CommandSynchronizer, SyncError, SyncResult, SyncedCommand};
