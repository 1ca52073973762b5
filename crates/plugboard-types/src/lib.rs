//! Shared types, adapter traits, and core utilities for Plugboard.
//!
//! This crate holds the foundational types shared between the core services,
//! the HTTP layer, and every storage adapter, so adapter crates depend on it
//! alone.

#![forbid(unsafe_code)]

pub mod error;
pub mod kv_adapter;
pub mod prelude;
pub mod types;
pub mod value;

// vim: ts=4
