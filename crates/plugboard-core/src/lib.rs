//! Core of Plugboard.
//!
//! Configuration objects describe their fields through a compile-time field
//! table (see [`configurable!`]). On top of that this crate provides descriptor
//! extraction, the structural merge of untyped updates, the plugin registry,
//! and the services behind the administrative API.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod auth;
pub mod commands;
pub mod describe;
pub mod extract;
pub mod field;
pub mod merge;
pub mod prelude;
pub mod registry;
pub mod service;

// Re-export commonly used types
pub use app::{App, AppBuilderOpts, AppState};
pub use describe::FieldDescriptor;
pub use extract::{Auth, OptionalRequestId, RequestId};
pub use field::{Configurable, Field, FieldValue, MergeError};
pub use plugboard_types::value::{Value, ValueMap};
pub use registry::{FrozenPluginRegistry, PluginHandle, PluginRegistry};

// vim: ts=4
