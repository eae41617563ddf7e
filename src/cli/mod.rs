//! CLI module
//!
//! Command-line interface for running ingestions.
//!
//! # Commands
//!
//! - `process` - Normalize a file and write outputs
//! - `inspect` - Show header detection and inferred types
//! - `event` - Replay an object-created event

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
