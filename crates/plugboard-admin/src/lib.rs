//! Admin API handlers for plugin configuration and the command table

pub mod commands;
pub mod plugins;

mod prelude;

// vim: ts=4
