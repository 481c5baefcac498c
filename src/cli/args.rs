//! CLI argument definitions using clap
//!
//! Commands:
//! - student-registry init --config <path>
//! - student-registry serve [--config <path>] [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// student-registry - CRUD service for student records
#[derive(Parser, Debug)]
#[command(name = "student-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Where to write the configuration
        #[arg(long, default_value = "./student-registry.json")]
        config: PathBuf,
    },

    /// Start the HTTP API
    Serve {
        /// Path to configuration file (built-in defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
