//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations of every
//! command port suitable for unit and behaviour tests without a live host
//! platform.

mod cache;
mod clock;
mod directory;
mod permissions;
mod responder;
mod sync;

pub use cache::InMemoryEntityCache;
pub use clock::ManualClock;
pub use directory::InMemoryDirectory;
pub use permissions::InMemoryPermissionSource;
pub use responder::{RecordedReplies, RecordingResponder};
pub use sync::InMemoryCommandSynchronizer;
