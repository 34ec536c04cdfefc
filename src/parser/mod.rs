//! Provider payload parsing into a uniform list of [`RawAchievement`]s.
//!
//! Two payload formats are supported:
//! - [`SteamParser`] - the Steam Web API `GetPlayerAchievements` JSON document
//! - [`GogParser`] - a GOG profile page with the achievement list embedded as
//!   a JavaScript assignment (`window.<ns>.achievements=[...];`)
//!
//! The [`Parser`] enum selects the parser for a configured
//! [`AchievementSource`]. The set of providers is closed, so dispatch is a
//! `match` rather than a registry.
//!
//! # Example
//!
//! ```
//! use achievements_core::parser::{AchievementParser, Parser};
//! use achievements_core::retriever::AchievementSource;
//!
//! let parser = Parser::for_source(AchievementSource::Gog);
//! let html = r#"window.profilesData.achievements=[{"achievement":{"name":"Doge Coins","description":"d"}}];"#;
//! let achievements = parser.parse(html).unwrap();
//! assert_eq!(achievements[0].name, "Doge Coins");
//! ```

mod embedded;
mod error;
mod gog;
mod steam;

pub use embedded::extract_embedded_json;
pub use error::ParseError;
pub use gog::GogParser;
pub use steam::SteamParser;

use serde_json::Value;

use crate::achievement::RawAchievement;
use crate::retriever::AchievementSource;

/// Decodes a provider response body into raw achievements.
pub trait AchievementParser {
    /// Returns the provider name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Returns true if an already decoded JSON document has this provider's shape.
    fn can_parse(&self, probe: &Value) -> bool;

    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] when the body cannot be decoded and a
    /// schema-level [`ParseError`] when a required key is missing.
    fn parse(&self, body: &str) -> Result<Vec<RawAchievement>, ParseError>;
}

/// Parser for one of the supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
    /// Steam Web API JSON.
    Steam(SteamParser),
    /// GOG profile page with embedded JSON.
    Gog(GogParser),
}

impl Parser {
    /// Returns the parser matching a provider.
    #[must_use]
    pub fn for_source(source: AchievementSource) -> Self {
        match source {
            AchievementSource::Steam => Self::Steam(SteamParser),
            AchievementSource::Gog => Self::Gog(GogParser),
        }
    }

    /// Identifies the provider of a decoded JSON document, if any parser accepts it.
    #[must_use]
    pub fn detect(probe: &Value) -> Option<AchievementSource> {
        [AchievementSource::Steam, AchievementSource::Gog]
            .into_iter()
            .find(|source| Self::for_source(*source).can_parse(probe))
    }

    fn inner(&self) -> &dyn AchievementParser {
        match self {
            Self::Steam(parser) => parser,
            Self::Gog(parser) => parser,
        }
    }
}

impl AchievementParser for Parser {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn can_parse(&self, probe: &Value) -> bool {
        self.inner().can_parse(probe)
    }

    fn parse(&self, body: &str) -> Result<Vec<RawAchievement>, ParseError> {
        self.inner().parse(body)
    }
}
