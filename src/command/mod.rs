//! Command routing and dispatch.
//!
//! Commands are declared against a [`registry::CommandRegistry`], frozen at
//! startup, and shared with a [`services::DispatchProcessor`] that accepts
//! both structured interactions and free-text chat messages.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: definitions, option descriptors, entities, argument values,
//!   and the free-text parser ([`domain`])
//! - **Registry**: registration and the freeze step ([`registry`])
//! - **Ports**: host platform collaborators ([`ports::DirectoryService`],
//!   [`ports::EntityCache`], [`ports::PermissionOverrideSource`],
//!   [`ports::Responder`], [`ports::CommandSynchronizer`])
//! - **Adapters**: in-memory implementations for tests ([`adapters::memory`])
//! - **Services**: conversion, permission evaluation, and dispatch
//!   ([`services`])
//!
//! # Example
//!
//! ```
//! use herald::command::domain::{OptionDescriptor, OptionType};
//! use herald::command::registry::{CommandRegistry, CommandUnit};
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register_unit(
//!         CommandUnit::new("Ping", "Checks the bot is alive")
//!             .with_option(OptionDescriptor::new("echo", OptionType::String)),
//!     )
//!     .expect("valid command");
//! registry.lock().expect("registry locks");
//!
//! assert!(registry.get("ping").is_some());
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod services;

#[cfg(test)]
mod tests;
