//! CLI Module Organization
//!
//! - args: CLI argument structures and flag value enums
//! - commands: command execution and configuration layering
//! - output: terminal tables and verdict lines

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
