//! CLI module
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Open the store, connect the cache and serve HTTP

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_service, init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
