//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use achievements_core::{AppConfig, UnlockFilter};
use clap::Parser;

/// Default settings file, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "appsettings.json";

/// Export a player's game achievements with their DLC requirements.
///
/// Achievements are fetched from Steam or GOG unless a result file for the
/// selected filter already exists in the output directory.
#[derive(Parser, Debug)]
#[command(name = "achievements")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Settings file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Provider to query (Steam or GoG), overriding the settings file
    #[arg(short, long)]
    pub source: Option<String>,

    /// Directory for result files, overriding the settings file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Keep only unlocked achievements
    #[arg(long, conflicts_with_all = ["locked", "all"])]
    pub unlocked: bool,

    /// Keep only achievements that are not unlocked
    #[arg(long, conflicts_with = "all")]
    pub locked: bool,

    /// Keep every achievement
    #[arg(long)]
    pub all: bool,
}

impl Args {
    /// Filter mode requested on the command line, if any.
    #[must_use]
    pub fn unlock_filter(&self) -> Option<UnlockFilter> {
        if self.unlocked {
            Some(UnlockFilter::Unlocked)
        } else if self.locked {
            Some(UnlockFilter::Locked)
        } else if self.all {
            Some(UnlockFilter::All)
        } else {
            None
        }
    }

    /// Applies command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(source) = &self.source {
            config.source.clone_from(source);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(filter) = self.unlock_filter() {
            config.unlock_filter = filter.as_flag();
        }
    }
}
