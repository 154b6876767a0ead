//! Minha API Core - Shared types library.
//!
//! This crate provides common types used across all Minha API components:
//! - `server` - HTTP service exposing the admin mount and API documentation
//! - `cli` - Command-line tools for schema export and route inspection
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP stack,
//! no templating. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - API metadata, documentation UI kinds, route names and the
//!   handler-free route index used for reverse lookup and introspection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
