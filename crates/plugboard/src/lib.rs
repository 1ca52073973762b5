//! Plugboard lets independently written modules expose their configuration
//! objects to administrators at runtime.
//!
//! # Features
//!
//! - Typed configuration objects, described through a compile-time field table
//! - Partial, type-checked updates (all-or-nothing per module)
//! - Persistence through a pluggable key-value adapter
//! - Admin HTTP API guarded by bearer tokens and the `SADM` role
//! - Command table (shell invocations per category) managed the same way

// Re-export shared types and adapter traits from plugboard-types
pub use plugboard_types::error;
pub use plugboard_types::kv_adapter;
pub use plugboard_types::types;
pub use plugboard_types::value;

// Core re-exports
pub use plugboard_admin as admin;
pub use plugboard_core::configurable;
pub use plugboard_core::{commands, describe, field, merge, registry, service};
pub use plugboard_core::{Configurable, FieldValue, PluginHandle, PluginRegistry, Value};

// Local modules
pub mod app;
pub mod middleware;
pub mod prelude;
pub mod routes;

pub use app::{App, AppBuilder};

// vim: ts=4
