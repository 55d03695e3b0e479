use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_merge::{
    config::Config,
    output::{write_playlist, write_run_log},
    services::PlaylistAggregator,
};

#[derive(Parser)]
#[command(name = "m3u-merge")]
#[command(version)]
#[command(about = "Merge IPTV M3U playlists from multiple sources with group, channel and keyword filtering")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (.json or .toml)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Output playlist path (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Run log path (overrides config file)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Probe every retained stream and record unreachable ones
    #[arg(long)]
    check_urls: bool,

    /// Merge same-named channels and rank their streams by resolution
    #[arg(long)]
    merge: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("m3u_merge={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting m3u-merge v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    // Override config with CLI arguments
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }
    config.check_urls |= cli.check_urls;
    config.merge_similar_channels |= cli.merge;

    let started_at = chrono::Local::now();
    let aggregator = PlaylistAggregator::from_config(&config)?;
    let output = aggregator.run(&config.sources).await;

    write_playlist(&config.output, &output.lines).await?;
    write_run_log(&config.log_file, &output.summary, started_at).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    }

    info!(
        "Done: {} with {} channel(s), log at {} ({} failed stream check(s))",
        config.output.display(),
        output.summary.merged_channels.unwrap_or(output.summary.retained_channels),
        config.log_file.display(),
        output.summary.failures.len()
    );

    Ok(())
}
