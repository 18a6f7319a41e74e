//! CLI module
//!
//! Command-line interface for the transfer tools.
//!
//! # Commands
//!
//! - `export` - Drain backend tables into snapshots
//! - `import` - Re-insert snapshots following the import plan
//! - `meetings` - Forward meetings to the webhook
//! - `contacts` - List CRM contacts of an owner
//! - `transcript` - Format a transcript file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
