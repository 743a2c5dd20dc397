use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use user_service::prelude::*;

/// user-service - HTTP CRUD service for users
#[derive(Parser)]
#[command(name = "user-service")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file, replacing the default search path
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    if let Some(port) = cli.port {
        config.service.port = port;
    }

    init_tracing(&config)?;

    let state = AppState::builder()
        .config(config.clone())
        .build()
        .await
        .context("failed to initialize application state")?;

    let result = Server::new(config).serve(router(state)).await;
    shutdown_tracing();

    result.context("server error")
}
