//! Common test utilities and helpers
//!
//! Shared testing infrastructure for the service integration tests: an
//! in-memory storage adapter and a set of small plugin configurations.

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;

pub use adapters::*;
pub use fixtures::*;

// vim: ts=4
