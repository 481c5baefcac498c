//! CLI command implementations

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::student::StudentService;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(config.as_deref(), port),
    }
}

/// Write the default configuration to `config_path`.
///
/// Refuses to overwrite an existing file.
pub fn init(config_path: &Path) -> CliResult<()> {
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(CliError::already_initialized(config_path))
        }
        Err(e) => {
            return Err(CliError::io_error(format!(
                "Failed to create {}: {}",
                config_path.display(),
                e
            )))
        }
    };

    let mut content = Config::default().to_json_pretty();
    content.push('\n');
    file.write_all(content.as_bytes())?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Open the configured store and cache and wire them into a service
pub fn build_service(config: &Config) -> CliResult<StudentService> {
    let store = config.store.open()?;
    let cache = config.cache.build()?;
    info!(
        store = %config.store.describe(),
        cache = %config.cache.describe(),
        "backends ready"
    );
    Ok(StudentService::new(store, cache))
}

/// Serve the HTTP API until Ctrl-C
///
/// 1. Load configuration (or defaults) and apply the port override
/// 2. Install logging
/// 3. Open store and cache
/// 4. Run the Axum server on a tokio runtime
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(port) = port {
        config.http.port = port;
        config.validate()?;
    }

    init_logging(&config.logging)?;

    let service = Arc::new(build_service(&config)?);
    let server = HttpServer::new(config.http.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}
