//! Replay: backs up inbound events read from a JSON-lines file.

use anyhow::{Context, Result};
use archiver_core::InboundEvent;
use backup::{BackupCoordinator, BackupOutcome, MediaOutcome, ProcessingError};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Counts per outcome for one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Non-blank lines read.
    pub lines: usize,
    /// Lines that were not a valid event.
    pub malformed: usize,
    pub saved: usize,
    pub media_stored: usize,
    pub media_failed: usize,
    pub already_backed_up: usize,
    /// Events rejected by mapping, storage or the deadline.
    pub failed: usize,
}

impl ReplaySummary {
    fn record(&mut self, result: &Result<BackupOutcome, ProcessingError>) {
        match result {
            Ok(BackupOutcome::Saved { media, .. }) => {
                self.saved += 1;
                match media {
                    MediaOutcome::Stored(_) => self.media_stored += 1,
                    MediaOutcome::Failed(_) => self.media_failed += 1,
                    MediaOutcome::None => {}
                }
            }
            Ok(BackupOutcome::AlreadyBackedUp { .. }) => self.already_backed_up += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Parses JSON lines into events. Blank lines are ignored; malformed lines are logged and counted.
pub fn parse_events(contents: &str) -> (Vec<InboundEvent>, usize) {
    let mut events = Vec::new();
    let mut malformed = 0;
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundEvent>(line) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed event line");
                malformed += 1;
            }
        }
    }
    (events, malformed)
}

/// Runs every event through the coordinator, at most `concurrency` at a time.
#[instrument(skip(coordinator, events), fields(events = events.len()))]
pub async fn replay_events(
    coordinator: Arc<BackupCoordinator>,
    events: Vec<InboundEvent>,
    concurrency: usize,
    deadline: Duration,
) -> ReplaySummary {
    let results: Vec<_> = stream::iter(events)
        .map(|event| {
            let coordinator = coordinator.clone();
            async move { coordinator.process_with_deadline(&event, deadline).await }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut summary = ReplaySummary::default();
    for result in &results {
        summary.record(result);
    }
    summary
}

/// Reads `path` and replays its events.
pub async fn replay_file(
    coordinator: Arc<BackupCoordinator>,
    path: &Path,
    concurrency: usize,
    deadline: Duration,
) -> Result<ReplaySummary> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read replay file {}", path.display()))?;
    let (events, malformed) = parse_events(&contents);
    let lines = events.len() + malformed;

    info!(
        file = %path.display(),
        events = events.len(),
        malformed,
        concurrency,
        "step: replay started"
    );

    let mut summary = replay_events(coordinator, events, concurrency, deadline).await;
    summary.lines = lines;
    summary.malformed = malformed;

    info!(summary = ?summary, "step: replay finished");
    Ok(summary)
}
