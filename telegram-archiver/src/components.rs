//! Component factory: builds the store, fetcher, coordinator and handler chain from config.

use anyhow::Result;
use backup::BackupCoordinator;
use handler_chain::HandlerChain;
use media_fetcher::HttpMediaFetcher;
use std::sync::Arc;
use storage::BackupRepository;
use teloxide::Bot;
use tracing::{error, info, instrument};

use crate::config::ArchiverConfig;
use crate::handlers::{BackupHandler, LoggingHandler};
use crate::resolver::TelegramFileResolver;

/// Shared dependencies for the runner and offline commands.
#[derive(Clone)]
pub struct ArchiverComponents {
    pub repo: Arc<BackupRepository>,
    pub coordinator: Arc<BackupCoordinator>,
    /// Present when a bot token is configured.
    pub teloxide_bot: Option<Bot>,
}

/// teloxide bot for the configured token and API server.
pub fn build_teloxide_bot(config: &ArchiverConfig) -> Result<Bot> {
    let bot = Bot::new(config.bot_token.clone());
    Ok(match config.api_url()? {
        Some(url) => bot.set_api_url(url),
        None => bot,
    })
}

/// Opens the repository and wires the fetcher and coordinator.
///
/// Platform file ids are resolved through Telegram only when a token is configured.
#[instrument(skip(config), fields(database_url = %config.database_url))]
pub async fn build_components(config: &ArchiverConfig) -> Result<ArchiverComponents> {
    let repo = Arc::new(
        BackupRepository::new(&config.database_url)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize backup storage"
                );
                anyhow::anyhow!("Failed to initialize backup storage: {}", e)
            })?,
    );

    let teloxide_bot = if config.has_token() {
        Some(build_teloxide_bot(config)?)
    } else {
        None
    };

    let mut fetcher =
        HttpMediaFetcher::with_timeouts(config.fetch_timeout(), config.fetch_stall_timeout());
    if let Some(bot) = &teloxide_bot {
        fetcher = fetcher.with_resolver(Arc::new(TelegramFileResolver::new(bot.clone())));
    } else {
        info!("No bot token configured, only direct URL media will be fetched");
    }

    let coordinator = Arc::new(BackupCoordinator::new(
        repo.clone(),
        Arc::new(fetcher),
        config.media_backup_dir.clone(),
    ));
    coordinator.ensure_backup_dir().await.map_err(|e| {
        error!(
            error = %e,
            dir = %config.media_backup_dir.display(),
            "Failed to create media backup directory"
        );
        anyhow::anyhow!("Failed to create media backup directory: {}", e)
    })?;

    info!(
        media_backup_dir = %config.media_backup_dir.display(),
        "Backup components ready"
    );

    Ok(ArchiverComponents {
        repo,
        coordinator,
        teloxide_bot,
    })
}

/// Builds the handler chain (logging → backup).
pub fn build_handler_chain(components: &ArchiverComponents, config: &ArchiverConfig) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler::new()))
        .add_handler(Arc::new(BackupHandler::new(
            components.coordinator.clone(),
            config.process_deadline(),
        )))
}
