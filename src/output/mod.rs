//! Persistence of the merged playlist and the human-readable run log.

use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::errors::AppResult;
use crate::models::{RunSummary, SourceStatus};
use crate::playlist::render;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the playlist, creating parent directories as needed
pub async fn write_playlist(path: &Path, lines: &[String]) -> AppResult<()> {
    ensure_parent(path).await?;
    tokio::fs::write(path, render(lines)).await?;
    info!("Wrote {} playlist line(s) to {}", lines.len(), path.display());
    Ok(())
}

pub async fn write_run_log(path: &Path, summary: &RunSummary, generated_at: DateTime<Local>) -> AppResult<()> {
    ensure_parent(path).await?;
    tokio::fs::write(path, render_run_log(summary, generated_at)).await?;
    info!("Wrote run log to {}", path.display());
    Ok(())
}

async fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Render the run log; zero counts are always written out
pub fn render_run_log(summary: &RunSummary, generated_at: DateTime<Local>) -> String {
    let mut log = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(log, "Generated at: {}", generated_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(log, "Sources: {}", summary.sources.len());
    for (index, source) in summary.sources.iter().enumerate() {
        let _ = writeln!(log, "  [{}] {}", index + 1, source.label);
        if source.label != source.url {
            let _ = writeln!(log, "      url: {}", source.url);
        }
        let _ = writeln!(
            log,
            "      user agent: {}",
            source.user_agent.as_deref().unwrap_or("none")
        );
        let _ = writeln!(log, "      filters: {}", source.filters);
        match &source.status {
            SourceStatus::Fetched { plain_list } => {
                let kind = if *plain_list { "plain list" } else { "m3u" };
                let _ = writeln!(log, "      status: fetched ({kind})");
            }
            SourceStatus::Failed { message } => {
                let _ = writeln!(log, "      status: failed - {message}");
            }
        }
        let _ = writeln!(
            log,
            "      retained channels: {}, failed checks: {}",
            source.retained_channels, source.failed_checks
        );
    }

    let _ = writeln!(log);
    let _ = writeln!(log, "Retained channels: {}", summary.retained_channels);
    for name in &summary.retained_names {
        let _ = writeln!(log, "  {name}");
    }
    if let Some(merged) = summary.merged_channels {
        let _ = writeln!(log, "Channels after merging: {merged}");
    }

    let _ = writeln!(log);
    let _ = writeln!(log, "Failed stream checks: {}", summary.failures.len());
    for failure in &summary.failures {
        let _ = writeln!(log, "  {failure}");
    }

    log
}
