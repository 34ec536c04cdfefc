//! CLI entry point for the achievements exporter.

use achievements_core::output::UPDATED_SUFFIX;
use achievements_core::{AchievementPipeline, AppConfig, PipelineOutcome};
use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, error, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    args.apply_overrides(&mut config);
    info!(
        source = %config.source,
        filter = %config.unlock_filter(),
        output_dir = %config.output_dir.display(),
        "Achievements exporter starting"
    );

    let pipeline = AchievementPipeline::from_config(&config)?;
    let report = match pipeline.run().await? {
        PipelineOutcome::Cached { path, report } => {
            info!(
                path = %path.display(),
                game = %report.game_name,
                count = report.achievements.len(),
                "Using existing result file"
            );
            report
        }
        PipelineOutcome::Fetched { path, report } => {
            info!(
                path = %path.display(),
                game = %report.game_name,
                count = report.achievements.len(),
                dlc_columns = report.dlc_names.len(),
                "Export complete"
            );
            report
        }
        PipelineOutcome::Unsuccessful { status, message } => {
            error!(status, message = %message, "Achievement retrieval failed");
            bail!("achievement retrieval failed with status {status}: {message}");
        }
    };

    let updated = pipeline.save(&report, UPDATED_SUFFIX)?;
    info!(path = %updated.display(), "Wrote updated result file");

    Ok(())
}
