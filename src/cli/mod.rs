//! CLI command handlers

pub mod commands;

pub use commands::{classes, import, inspect, ImportArgs};
