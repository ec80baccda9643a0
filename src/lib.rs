//! Herald: command routing and dispatch for chat-platform bots.
//!
//! Bots declare named commands and sub-commands up front; Herald accepts
//! invocations either as structured interactions with pre-typed arguments or
//! as free-text chat messages, converts the arguments to strong types, gates
//! them behind cached per-guild permissions, and routes them to handlers.
//!
//! # Architecture
//!
//! Herald follows hexagonal architecture principles:
//!
//! - **Domain**: Pure command metadata and argument types
//! - **Ports**: Abstract trait interfaces for the host platform
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`command`]: Registration, conversion, permission checks, and dispatch

pub mod command;
