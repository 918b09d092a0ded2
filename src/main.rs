use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scopelink_host::command::CommandExecutor;
use scopelink_host::config::HostConfig;

/// Microscope acquisition host with TCP remote control
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => HostConfig::from_file(path)?,
        None => HostConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    info!("Acquisition host starting");
    info!("  objective: {}", config.objectives[0].name);
    info!("  stage: {} um/s, {} ms settle", config.stage_speed_um_s, config.stage_settle_ms);

    let executor = Arc::new(CommandExecutor::from_config(&config)?);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Remote control listening on {}", config.bind_addr);

    scopelink_host::serve(listener, executor).await
}
