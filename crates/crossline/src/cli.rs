//! Command-line interface for crossline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crossline::DEFAULT_PORT;

/// Crossline - two-player tic-tac-toe over plain TCP lines
#[derive(Parser, Debug)]
#[command(name = "crossline")]
#[command(about = "Two-player tic-tac-toe server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host one session for two players
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Join a server from this terminal
    Play {
        /// Server host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}
