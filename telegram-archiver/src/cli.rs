//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ArchiverConfig;

#[derive(Parser, Debug)]
#[command(name = "tg-archiver")]
#[command(about = "Telegram message and media backup", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the archiver against Telegram (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Back up events from a JSON-lines file, one inbound event per line.
    Replay {
        file: PathBuf,
        /// Events processed at once (defaults to REPLAY_CONCURRENCY).
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Used to resolve Telegram file ids (defaults to BOT_TOKEN).
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print totals for the backup database.
    Stats,
}

/// Load ArchiverConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<ArchiverConfig> {
    ArchiverConfig::load(token)
}
