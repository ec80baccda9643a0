//! Unit tests for the command module.
//!
//! Tests are organised by service, covering happy paths, error cases, and
//! edge cases of registration, input handling, permissions, dispatch, and
//! synchronization.

mod fixtures;
mod permission_tests;
mod sync_tests;
