//! Crossline command-line entry point.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use crossline::{CrosslineServer, DEFAULT_MAX_LINE_LEN, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => {
            init_tracing("info");
            let mut config = match config {
                Some(path) => ServerConfig::load(&path)?,
                None => ServerConfig::default(),
            };
            config.override_bind(host.as_deref(), port);
            run_server(config).await
        }
        Command::Play { host, port } => {
            init_tracing("warn");
            crossline::client::play(&format!("{host}:{port}"), DEFAULT_MAX_LINE_LEN)
                .await
                .with_context(|| format!("cannot play on {host}:{port}"))
        }
    }
}

/// Logs go to stderr so the client's stdout stays clean.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let bind_addr = config.bind_addr.clone();
    let server = CrosslineServer::builder()
        .config(config)
        .build()
        .await
        .with_context(|| format!("cannot listen on {bind_addr}"))?;
    info!(addr = %server.local_addr()?, "Server is running");

    let outcome = server.run().await?;
    info!(
        games = outcome.games_finished,
        phase = %outcome.phase,
        "Server shutting down"
    );
    Ok(())
}
