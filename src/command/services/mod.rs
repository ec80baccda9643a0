//! Services orchestrating the command ports.
//!
//! Conversion, input normalization, cooldown, permission evaluation,
//! dispatch, and synchronization.

pub mod conversion;
pub mod cooldown;
pub mod dispatch;
pub mod input;
pub mod permission;
pub mod sync;

pub use conversion::{ConversionError, ConversionResult, ValueConverter};
pub use cooldown::CallerCooldown;
pub use dispatch::{DenyReason, DispatchOutcome, DispatchProcessor, IgnoreReason};
pub use input::CanonicalInvocation;
pub use permission::{
    PermissionCache, PermissionCacheEntry, PermissionError, PermissionEvaluator, PermissionResult,
};
pub use sync::{CommandSyncError, CommandSyncService};
