//! REPL runner: converts teloxide messages to inbound events and passes them to the handler chain.

use anyhow::Result;
use archiver_core::{init_tracing, ToInboundEvent};
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use crate::adapters::TelegramMessageWrapper;
use crate::components::{build_components, build_handler_chain};
use crate::config::ArchiverConfig;

/// Starts the REPL. Each message is converted and handled in its own task so a slow download
/// never delays the next update.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Connected as bot");
        }
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: Message| {
        let chain = chain.clone();

        async move {
            let event = TelegramMessageWrapper(&msg).to_event();

            tokio::spawn(async move {
                info!(
                    message_id = ?event.message_id,
                    "step: processing message (handler chain started)"
                );
                if let Err(e) = chain.handle(&event).await {
                    error!(error = %e, message_id = ?event.message_id, "Handler chain failed");
                }
            });

            respond(())
        }
    })
    .await;

    Ok(())
}

/// Main entry: validate config, init logging, build components, then run the REPL.
pub async fn run_archiver(config: ArchiverConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        media_backup_dir = %config.media_backup_dir.display(),
        "Initializing archiver"
    );

    let components = build_components(&config).await?;
    let bot = components
        .teloxide_bot
        .clone()
        .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN is not set (or pass --token)"))?;
    let handler_chain = build_handler_chain(&components, &config);

    info!("Archiver started successfully");

    run_repl(bot, handler_chain).await
}
