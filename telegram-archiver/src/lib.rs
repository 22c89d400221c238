//! # Telegram archiver application
//!
//! Wires storage, media-fetcher, backup and handler-chain. Loads config from env, then either runs
//! the teloxide REPL or works offline (replay, stats).

pub mod adapters;
pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod replay;
pub mod resolver;
pub mod runner;
pub mod stats;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use cli::{load_config, Cli, Commands};
pub use components::{build_components, build_handler_chain, build_teloxide_bot, ArchiverComponents};
pub use config::ArchiverConfig;
pub use handlers::{BackupHandler, LoggingHandler};
pub use replay::{parse_events, replay_events, replay_file, ReplaySummary};
pub use resolver::{download_url, TelegramFileResolver};
pub use runner::{run_archiver, run_repl};
pub use stats::format_stats;
