//! Provider retrieval strategies.
//!
//! A retriever builds the provider-specific request, sends exactly one
//! request, and hands the body to the matching [`Parser`]. The outcome is a
//! uniform [`RetrievalResult`].
//!
//! # Architecture
//!
//! - [`AchievementsRetriever`] - Async trait implemented by each provider
//! - [`SteamRetriever`] - Steam Web API (query parameters on a fixed base URL)
//! - [`GogRetriever`] - GOG profile page (URL template with placeholders)
//! - [`Retriever`] - Dispatcher over the closed set of providers
//!
//! A non-success HTTP status is data (`success == false`), while a transport
//! failure is an error propagated to the caller.
//!
//! # Example
//!
//! ```no_run
//! use achievements_core::config::AppConfig;
//! use achievements_core::retriever::{AchievementsRetriever, Retriever};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load("appsettings.json".as_ref())?;
//! let retriever = Retriever::from_config(&config)?;
//! let result = retriever.fetch_all().await?;
//! println!("HTTP {} with {} achievements", result.status_code, result.achievements.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod gog;
mod http_client;
mod steam;

pub use error::RetrieveError;
pub use gog::GogRetriever;
pub use steam::SteamRetriever;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};
use url::Url;

use crate::achievement::RawAchievement;
use crate::config::AppConfig;
use crate::parser::{AchievementParser, Parser};

/// Media type requested from both providers.
const ACCEPT_JSON: &str = "application/json";

/// Supported achievement providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementSource {
    /// Steam Web API.
    Steam,
    /// GOG profile pages.
    Gog,
}

impl AchievementSource {
    /// Returns the display label, also used as the output file name prefix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steam => "Steam",
            Self::Gog => "GoG",
        }
    }
}

impl fmt::Display for AchievementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AchievementSource {
    type Err = RetrieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "steam" => Ok(Self::Steam),
            "gog" => Ok(Self::Gog),
            _ => Err(RetrieveError::UnsupportedSource {
                name: s.to_string(),
            }),
        }
    }
}

/// Outcome of one fetch attempt.
#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    /// True when the provider answered with a success status.
    pub success: bool,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Human-readable failure description when `success` is false.
    pub error_message: Option<String>,
    /// Game name reported with the achievements, when known.
    pub game_name: Option<String>,
    /// Parsed achievements; empty when `success` is false.
    pub achievements: Vec<RawAchievement>,
}

impl RetrievalResult {
    /// Creates a successful result; the game name comes from the first achievement.
    #[must_use]
    pub fn succeeded(status_code: u16, achievements: Vec<RawAchievement>) -> Self {
        let game_name = achievements
            .first()
            .map(|achievement| achievement.game_name.clone())
            .filter(|name| !name.is_empty());
        Self {
            success: true,
            status_code,
            error_message: None,
            game_name,
            achievements,
        }
    }

    /// Creates a result for a non-success HTTP status.
    #[must_use]
    pub fn failed(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            error_message: Some(message.into()),
            game_name: None,
            achievements: Vec::new(),
        }
    }
}

/// Trait implemented by every provider retrieval strategy.
///
/// # Object Safety
///
/// This trait uses `async_trait` so strategies and test doubles can be used
/// behind generics or trait objects alike.
#[async_trait]
pub trait AchievementsRetriever: Send + Sync {
    /// Returns the provider this retriever talks to.
    fn source(&self) -> AchievementSource;

    /// Fetches the full achievement list with a single request.
    ///
    /// # Errors
    ///
    /// Returns [`RetrieveError::Configuration`] before any request when
    /// settings are incomplete, a transport-class error when the request
    /// cannot complete, and [`RetrieveError::Parse`] when a success body
    /// cannot be decoded.
    async fn fetch_all(&self) -> Result<RetrievalResult, RetrieveError>;
}

/// Retriever for one of the supported providers.
#[derive(Debug)]
pub enum Retriever {
    /// Steam Web API strategy.
    Steam(SteamRetriever),
    /// GOG profile page strategy.
    Gog(GogRetriever),
}

impl Retriever {
    /// Selects the strategy for the configured provider selector.
    ///
    /// # Errors
    ///
    /// Returns [`RetrieveError::UnsupportedSource`] for an unknown selector
    /// and [`RetrieveError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RetrieveError> {
        let source = config.source.parse::<AchievementSource>()?;
        Self::select(source, config)
    }

    /// Builds the strategy for a provider.
    ///
    /// # Errors
    ///
    /// Returns [`RetrieveError::Client`] if the HTTP client cannot be built.
    pub fn select(source: AchievementSource, config: &AppConfig) -> Result<Self, RetrieveError> {
        debug!(source = %source, "Selecting achievement retriever");
        Ok(match source {
            AchievementSource::Steam => {
                Self::Steam(SteamRetriever::new(config.steam.clone(), config.http)?)
            }
            AchievementSource::Gog => Self::Gog(GogRetriever::new(config.gog.clone(), config.http)?),
        })
    }
}

#[async_trait]
impl AchievementsRetriever for Retriever {
    fn source(&self) -> AchievementSource {
        match self {
            Self::Steam(retriever) => retriever.source(),
            Self::Gog(retriever) => retriever.source(),
        }
    }

    async fn fetch_all(&self) -> Result<RetrievalResult, RetrieveError> {
        match self {
            Self::Steam(retriever) => retriever.fetch_all().await,
            Self::Gog(retriever) => retriever.fetch_all().await,
        }
    }
}

/// Returns the first field whose value is empty or whitespace.
pub(crate) fn first_missing<'a>(fields: &[(&'a str, &str)]) -> Option<&'a str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

/// Sends one `GET` and decodes a success body with the provider's parser.
///
/// `display_url` is used in logs and errors in place of `url`, so credentials
/// carried in the query string are never printed.
pub(crate) async fn send_and_parse(
    client: &Client,
    url: Url,
    display_url: &str,
    parser: Parser,
) -> Result<RetrievalResult, RetrieveError> {
    let response = client
        .get(url)
        .header(ACCEPT, ACCEPT_JSON)
        .send()
        .await
        .map_err(|e| RetrieveError::from_request(display_url, e))?;

    let status = response.status();
    if !status.is_success() {
        warn!(
            provider = parser.name(),
            status = status.as_u16(),
            url = display_url,
            "Provider returned a non-success status"
        );
        return Ok(RetrievalResult::failed(
            status.as_u16(),
            format!("{} returned HTTP {}", parser.name(), status.as_u16()),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| RetrieveError::from_request(display_url, e))?;
    let achievements = parser.parse(&body)?;
    debug!(
        provider = parser.name(),
        count = achievements.len(),
        "Retrieved achievements"
    );
    Ok(RetrievalResult::succeeded(status.as_u16(), achievements))
}
