//! Achievements Core Library
//!
//! This library fetches a player's achievement list for a single game from
//! Steam (REST JSON) or GOG (HTML profile page with an embedded JSON blob),
//! filters it by unlock status, enriches every entry with DLC requirements
//! read from the game's data files, and exports the result as a `;`-delimited
//! file that doubles as a cache for later runs.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`achievement`] - Data model, unlock filter and DLC enrichment
//! - [`parser`] - Provider payload parsers (JSON and HTML-embedded JSON)
//! - [`retriever`] - Provider request strategies and their dispatcher
//! - [`output`] - File naming, cache lookup and CSV serialization
//! - [`gamedata`] - Localisation and achievement-structure file parsing
//! - [`config`] - Application and per-provider settings
//! - [`pipeline`] - Cache-or-fetch orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod achievement;
pub mod config;
pub mod gamedata;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod retriever;
mod user_agent;

// Re-export commonly used types
pub use achievement::{
    DlcGroup, EnrichedAchievement, RawAchievement, RequirementRecord, RequirementToken,
    UnlockFilter, UnlockState, enrich, index_requirements,
};
pub use config::{AppConfig, ConfigError};
pub use gamedata::{GameDataError, GameDataFiles, ParsedStructure, RequirementSource};
pub use output::{CacheLookup, FilenameResolver, OutputError, find_existing};
pub use parser::{AchievementParser, GogParser, ParseError, Parser, SteamParser};
pub use pipeline::{AchievementPipeline, AchievementReport, PipelineError, PipelineOutcome};
pub use retriever::{
    AchievementSource, AchievementsRetriever, GogRetriever, RetrievalResult, RetrieveError,
    Retriever, SteamRetriever,
};
