use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::transport::stdio;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use app_launcher::{Config, Dispatcher, LauncherServer, SystemLauncher};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // stderr only: stdout carries the JSON-RPC transport.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    info!("app-launcher v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        applications_dir = %config.applications_dir.display(),
        open_program = %config.open_program,
        "configuration loaded"
    );

    let launcher = Arc::new(SystemLauncher::new(&config));
    let dispatcher = Dispatcher::new(launcher, config.listing_failure);

    LauncherServer::new(dispatcher)
        .run(stdio())
        .await
        .context("MCP transport failed")?;

    Ok(())
}
