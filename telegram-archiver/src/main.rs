//! Binary for the Telegram archiver.

use anyhow::Result;
use archiver_core::init_tracing;
use clap::Parser;
use telegram_archiver::{
    build_components, format_stats, load_config, replay_file, run_archiver, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_archiver(config).await
        }
        Commands::Replay {
            file,
            concurrency,
            token,
        } => {
            let config = load_config(token)?;
            config.validate_storage()?;
            config.api_url()?;
            init_tracing(&config.log_file)?;

            let components = build_components(&config).await?;
            let summary = replay_file(
                components.coordinator.clone(),
                &file,
                concurrency.unwrap_or(config.replay_concurrency),
                config.process_deadline(),
            )
            .await?;

            println!(
                "Replayed {} lines: {} saved ({} with media, {} media failed), {} already backed up, {} failed, {} malformed",
                summary.lines,
                summary.saved,
                summary.media_stored,
                summary.media_failed,
                summary.already_backed_up,
                summary.failed,
                summary.malformed
            );
            Ok(())
        }
        Commands::Stats => {
            let config = load_config(None)?;
            config.validate_storage()?;
            init_tracing(&config.log_file)?;

            let components = build_components(&config).await?;
            let stats = components.repo.get_stats().await?;
            print!("{}", format_stats(&stats));
            Ok(())
        }
    }
}
