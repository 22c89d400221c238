//! Archiver config: Telegram connection, logging, database, media backup and fetch tuning.

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "telegram_backup.db";
pub const DEFAULT_MEDIA_BACKUP_DIR: &str = "telegram_media_backup";
pub const DEFAULT_LOG_FILE: &str = "logs/telegram-archiver.log";

#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    /// BOT_TOKEN; empty when unset (offline commands do not need it)
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// DATABASE_URL: a file path or `sqlite:` URL
    pub database_url: String,
    /// MEDIA_BACKUP_DIR
    pub media_backup_dir: PathBuf,
    /// FETCH_TIMEOUT_SECS: upper bound for one media transfer
    pub fetch_timeout_secs: u64,
    /// FETCH_STALL_TIMEOUT_SECS: longest wait for the next body chunk
    pub fetch_stall_timeout_secs: u64,
    /// PROCESS_DEADLINE_SECS: upper bound for one event end to end
    pub process_deadline_secs: u64,
    /// REPLAY_CONCURRENCY
    pub replay_concurrency: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl ArchiverConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token
            .or_else(|| env::var("BOT_TOKEN").ok())
            .unwrap_or_default();
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let media_backup_dir = env::var("MEDIA_BACKUP_DIR")
            .unwrap_or_else(|_| DEFAULT_MEDIA_BACKUP_DIR.to_string())
            .into();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            media_backup_dir,
            fetch_timeout_secs: env_or("FETCH_TIMEOUT_SECS", 120),
            fetch_stall_timeout_secs: env_or("FETCH_STALL_TIMEOUT_SECS", 30),
            process_deadline_secs: env_or("PROCESS_DEADLINE_SECS", 300),
            replay_concurrency: env_or("REPLAY_CONCURRENCY", 4usize).max(1),
        })
    }

    pub fn has_token(&self) -> bool {
        !self.bot_token.trim().is_empty()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn fetch_stall_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_stall_timeout_secs)
    }

    pub fn process_deadline(&self) -> Duration {
        Duration::from_secs(self.process_deadline_secs)
    }

    /// Parsed API URL, if one is configured.
    pub fn api_url(&self) -> Result<Option<reqwest::Url>> {
        match &self.telegram_api_url {
            Some(url_str) => reqwest::Url::parse(url_str).map(Some).map_err(|_| {
                anyhow::anyhow!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                )
            }),
            None => Ok(None),
        }
    }

    /// Validate everything needed to run against Telegram.
    pub fn validate(&self) -> Result<()> {
        if !self.has_token() {
            anyhow::bail!("BOT_TOKEN is not set (or pass --token)");
        }
        self.api_url()?;
        self.validate_storage()
    }

    /// Validate only the settings needed by offline commands (replay, stats).
    pub fn validate_storage(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is empty");
        }
        if self.media_backup_dir.as_os_str().is_empty() {
            anyhow::bail!("MEDIA_BACKUP_DIR is empty");
        }
        if self.process_deadline_secs == 0 {
            anyhow::bail!("PROCESS_DEADLINE_SECS must be greater than 0");
        }
        Ok(())
    }
}
