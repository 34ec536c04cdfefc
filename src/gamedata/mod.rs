//! Game data files providing achievement names and DLC requirements.
//!
//! The enrichment step only needs two things from the game installation: a
//! localisation map and the requirement records derived from the
//! achievement-structure file. [`RequirementSource`] is that seam;
//! [`GameDataFiles`] reads both from disk.

mod descriptions;
mod structure;

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::achievement::RequirementRecord;
use crate::config::GameDataSettings;

/// Errors that can occur while reading game data files.
#[derive(Debug, Error)]
pub enum GameDataError {
    /// File could not be read
    #[error("failed to read game data file '{path}': {source}\n  Suggestion: Check `game_data` paths in the settings file")]
    Io {
        /// Path of the file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Structure file is not valid script
    #[error("syntax error in '{path}' at line {line}: {reason}")]
    Syntax {
        /// Path of the file
        path: PathBuf,
        /// 1-based line of the error
        line: usize,
        /// What was wrong
        reason: String,
    },
}

/// Requirement records plus every DLC name they mention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStructure {
    /// One record per achievement block.
    pub records: Vec<RequirementRecord>,
    /// DLC names seen in any requirement, sorted.
    pub dlc_names: BTreeSet<String>,
}

/// Supplier of localisation text and DLC requirement records.
pub trait RequirementSource {
    /// Returns localisation keys mapped to display text.
    ///
    /// # Errors
    ///
    /// Returns [`GameDataError`] if the localisation data cannot be read.
    fn parse_descriptions(&self) -> Result<HashMap<String, String>, GameDataError>;

    /// Returns requirement records with names resolved through `descriptions`.
    ///
    /// # Errors
    ///
    /// Returns [`GameDataError`] if the structure data cannot be read or parsed.
    fn parse_structure(
        &self,
        descriptions: &HashMap<String, String>,
    ) -> Result<ParsedStructure, GameDataError>;
}

/// Localisation and structure files of an installed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDataFiles {
    descriptions_path: PathBuf,
    structure_path: PathBuf,
}

impl GameDataFiles {
    /// Creates a source reading the two given files.
    #[must_use]
    pub fn new(descriptions_path: impl Into<PathBuf>, structure_path: impl Into<PathBuf>) -> Self {
        Self {
            descriptions_path: descriptions_path.into(),
            structure_path: structure_path.into(),
        }
    }

    /// Creates a source from the `game_data` settings section.
    #[must_use]
    pub fn from_settings(settings: &GameDataSettings) -> Self {
        Self::new(settings.descriptions_file(), settings.structure_file())
    }

    /// Path of the localisation file.
    #[must_use]
    pub fn descriptions_path(&self) -> &Path {
        &self.descriptions_path
    }

    /// Path of the structure file.
    #[must_use]
    pub fn structure_path(&self) -> &Path {
        &self.structure_path
    }
}

fn read_text(path: &Path) -> Result<String, GameDataError> {
    fs::read_to_string(path).map_err(|source| GameDataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl RequirementSource for GameDataFiles {
    #[instrument(skip(self), fields(path = %self.descriptions_path.display()))]
    fn parse_descriptions(&self) -> Result<HashMap<String, String>, GameDataError> {
        let text = read_text(&self.descriptions_path)?;
        let entries = descriptions::parse_descriptions(&text);
        debug!(entries = entries.len(), "Loaded localisation entries");
        Ok(entries)
    }

    #[instrument(skip(self, descriptions), fields(path = %self.structure_path.display()))]
    fn parse_structure(
        &self,
        descriptions: &HashMap<String, String>,
    ) -> Result<ParsedStructure, GameDataError> {
        let text = read_text(&self.structure_path)?;
        structure::parse_structure(&text, descriptions).map_err(|e| GameDataError::Syntax {
            path: self.structure_path.clone(),
            line: e.line,
            reason: e.reason,
        })
    }
}
