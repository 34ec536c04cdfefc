//! Cache-or-fetch orchestration for one game.
//!
//! A run first probes the output directory for a result file of the current
//! filter mode. A hit is loaded and returned without any network traffic.
//! On a miss the provider is queried once, the list is filtered, joined with
//! the game's DLC requirements and written out.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::achievement::{EnrichedAchievement, UnlockFilter, enrich, index_requirements};
use crate::config::AppConfig;
use crate::gamedata::{GameDataError, GameDataFiles, RequirementSource};
use crate::output::{CacheLookup, FilenameResolver, OutputError, find_existing, read_csv, write_csv};
use crate::retriever::{AchievementsRetriever, RetrieveError, Retriever};

/// Game name used when the provider reports none.
pub const UNKNOWN_GAME_NAME: &str = "Unknown";

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Retrieval failed before a response was available
    #[error(transparent)]
    Retrieve(#[from] RetrieveError),

    /// Game data files could not be read
    #[error(transparent)]
    GameData(#[from] GameDataError),

    /// Result file could not be read or written
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Achievements of one game, as written to or read from a result file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementReport {
    /// Game the achievements belong to.
    pub game_name: String,
    /// DLC names used as extra columns.
    pub dlc_names: BTreeSet<String>,
    /// Enriched achievements in provider order.
    pub achievements: Vec<EnrichedAchievement>,
}

/// How a run produced its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// An existing result file was loaded; nothing was fetched.
    Cached {
        /// File the report was read from
        path: PathBuf,
        /// Loaded report
        report: AchievementReport,
    },
    /// Achievements were fetched, enriched and written.
    Fetched {
        /// File the report was written to
        path: PathBuf,
        /// Written report
        report: AchievementReport,
    },
    /// The provider answered with a non-success status; nothing was written.
    Unsuccessful {
        /// HTTP status code
        status: u16,
        /// Failure description
        message: String,
    },
}

impl PipelineOutcome {
    /// Returns the report for cached and fetched outcomes.
    #[must_use]
    pub fn report(&self) -> Option<&AchievementReport> {
        match self {
            Self::Cached { report, .. } | Self::Fetched { report, .. } => Some(report),
            Self::Unsuccessful { .. } => None,
        }
    }
}

/// Runs the cache-or-fetch flow for one provider and filter mode.
#[derive(Debug)]
pub struct AchievementPipeline<R, G> {
    retriever: R,
    requirements: G,
    resolver: FilenameResolver,
    output_dir: PathBuf,
}

impl AchievementPipeline<Retriever, GameDataFiles> {
    /// Builds the pipeline described by the settings.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Retrieve`] for an unsupported source or if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let retriever = Retriever::from_config(config)?;
        Ok(Self::new(
            retriever,
            GameDataFiles::from_settings(&config.game_data),
            config.unlock_filter(),
            config.output_dir.clone(),
        ))
    }
}

impl<R, G> AchievementPipeline<R, G>
where
    R: AchievementsRetriever,
    G: RequirementSource,
{
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        retriever: R,
        requirements: G,
        filter: UnlockFilter,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let resolver = FilenameResolver::new(retriever.source(), filter);
        Self {
            retriever,
            requirements,
            resolver,
            output_dir: output_dir.into(),
        }
    }

    /// Runs one cache probe and, on a miss, one fetch.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when retrieval fails at the transport or
    /// parsing level, when game data cannot be read, or when a result file
    /// cannot be read or written. No file is written on error.
    #[tracing::instrument(skip(self), fields(source = %self.retriever.source(), filter = %self.resolver.filter()))]
    pub async fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        if let CacheLookup::Found(path) =
            find_existing(&self.output_dir, &self.resolver.cache_pattern())
        {
            let report = self.load(&path)?;
            info!(
                path = %path.display(),
                count = report.achievements.len(),
                "Loaded achievements from existing result file"
            );
            return Ok(PipelineOutcome::Cached { path, report });
        }

        let result = self.retriever.fetch_all().await?;
        if !result.success {
            let message = result
                .error_message
                .unwrap_or_else(|| format!("HTTP {}", result.status_code));
            warn!(status = result.status_code, message = %message, "Retrieval unsuccessful");
            return Ok(PipelineOutcome::Unsuccessful {
                status: result.status_code,
                message,
            });
        }

        let retrieved = result.achievements.len();
        let kept = self.resolver.filter().apply(result.achievements);
        debug!(retrieved, kept = kept.len(), "Filtered achievements");

        let descriptions = self.requirements.parse_descriptions()?;
        let structure = self.requirements.parse_structure(&descriptions)?;
        let index = index_requirements(structure.records);

        let report = AchievementReport {
            game_name: result
                .game_name
                .unwrap_or_else(|| UNKNOWN_GAME_NAME.to_string()),
            dlc_names: structure.dlc_names,
            achievements: enrich(&kept, &index),
        };
        let path = self.save(&report, "")?;
        info!(
            path = %path.display(),
            count = report.achievements.len(),
            "Saved achievements"
        );
        Ok(PipelineOutcome::Fetched { path, report })
    }

    /// Writes a report to the resolved path for `suffix` and returns that path.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Output`] if the file cannot be written.
    pub fn save(&self, report: &AchievementReport, suffix: &str) -> Result<PathBuf, PipelineError> {
        let path = self
            .resolver
            .full_path(&self.output_dir, &report.game_name, suffix);
        write_csv(&path, &report.dlc_names, &report.achievements)?;
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<AchievementReport, PipelineError> {
        let achieved = self.resolver.filter() == UnlockFilter::Unlocked;
        let contents = read_csv(path, achieved)?;
        Ok(AchievementReport {
            game_name: self
                .resolver
                .game_name_from(path)
                .unwrap_or_else(|| UNKNOWN_GAME_NAME.to_string()),
            dlc_names: contents.dlc_names,
            achievements: contents.achievements,
        })
    }
}
