//! Human-readable backup totals for the `stats` command.

use std::fmt::Write;
use storage::BackupStats;

pub fn format_stats(stats: &BackupStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Messages:      {}", stats.total_messages);
    let _ = writeln!(out, "Media files:   {}", stats.total_media);
    for (media_type, count) in &stats.media_by_type {
        let _ = writeln!(out, "  {:<12} {}", media_type, count);
    }
    let _ = writeln!(out, "Chats:         {}", stats.unique_chats);
    let _ = writeln!(out, "Users:         {}", stats.unique_users);
    match (stats.first_message, stats.last_message) {
        (Some(first), Some(last)) => {
            let _ = writeln!(out, "First message: {}", first.to_rfc3339());
            let _ = writeln!(out, "Last message:  {}", last.to_rfc3339());
        }
        _ => {
            let _ = writeln!(out, "No messages backed up yet");
        }
    }
    out
}
