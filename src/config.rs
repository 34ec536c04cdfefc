//! Application configuration loaded from a JSON settings file.
//!
//! Every section has defaults so a partial file is accepted. Provider
//! settings are only checked for completeness by the retriever that uses
//! them, right before it would issue a request.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::achievement::UnlockFilter;

/// Default connect timeout for provider requests.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default overall timeout for provider requests.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for the expected layout
    #[error("failed to parse config file '{path}': {source}\n  Suggestion: Compare it with the documented appsettings.json layout")]
    Parse {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A value is outside its accepted range
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Top-level application settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Active provider selector (`Steam` or `GoG`).
    pub source: String,
    /// Directory for result files, also probed as cache.
    pub output_dir: PathBuf,
    /// `true` = unlocked only, `false` = locked only, absent = everything.
    pub unlock_filter: Option<bool>,
    /// Steam Web API settings.
    pub steam: SteamSettings,
    /// GOG profile page settings.
    pub gog: GogSettings,
    /// Location of the game's localisation and achievement-structure files.
    pub game_data: GameDataSettings,
    /// HTTP client settings.
    pub http: HttpSettings,
}

impl AppConfig {
    /// Loads and validates settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates values that have a fixed accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("http.connect_timeout_secs", self.http.connect_timeout_secs)?;
        validate_timeout_secs("http.read_timeout_secs", self.http.read_timeout_secs)?;
        Ok(())
    }

    /// Returns the configured unlock filter mode.
    #[must_use]
    pub fn unlock_filter(&self) -> UnlockFilter {
        UnlockFilter::from(self.unlock_filter)
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if (1..=3600).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value}. Expected range: 1..=3600"),
        })
    }
}

/// Steam Web API settings.
///
/// `Debug` output omits the API key.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SteamSettings {
    /// Base URL of `GetPlayerAchievements`.
    pub address_api: String,
    /// Steam application id of the game.
    pub application_id: String,
    /// Steam Web API key.
    pub authentication_key: String,
    /// 64-bit Steam id of the player.
    pub steam_id: String,
    /// Language code for names and descriptions.
    pub language: String,
}

impl fmt::Debug for SteamSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamSettings")
            .field("address_api", &self.address_api)
            .field("application_id", &self.application_id)
            .field("steam_id", &self.steam_id)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

/// GOG profile page settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GogSettings {
    /// Profile URL template with `{User}` and `{GameId}` placeholders.
    pub address_api: String,
    /// GOG user name.
    pub user: String,
    /// GOG game id.
    pub game_id: String,
    /// Game name used for file naming; the page does not carry one.
    pub game_name: Option<String>,
}

/// Location of the game data files used for DLC enrichment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameDataSettings {
    /// Game installation directory.
    pub game_directory: PathBuf,
    /// Localisation file with achievement names, relative to `game_directory`.
    pub descriptions_path: PathBuf,
    /// Achievement-structure file, relative to `game_directory`.
    pub structure_path: PathBuf,
}

impl GameDataSettings {
    /// Full path of the localisation file.
    #[must_use]
    pub fn descriptions_file(&self) -> PathBuf {
        self.game_directory.join(&self.descriptions_path)
    }

    /// Full path of the achievement-structure file.
    #[must_use]
    pub fn structure_file(&self) -> PathBuf {
        self.game_directory.join(&self.structure_path)
    }
}

/// HTTP client timeouts.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}
