//! Steam Web API `ISteamUserStats/GetPlayerAchievements` response parser.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::achievement::{RawAchievement, UnlockState};

use super::{AchievementParser, ParseError};

const PROVIDER: &str = "steam";

// ==================== Steam API Response Types ====================

#[derive(Debug, Deserialize)]
struct SteamResponse {
    playerstats: PlayerStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerStats {
    #[serde(default)]
    game_name: String,
    achievements: Vec<SteamAchievement>,
}

#[derive(Debug, Deserialize)]
struct SteamAchievement {
    #[serde(default)]
    apiname: String,
    /// Binary flag: 1 = unlocked, 0 = locked.
    achieved: u8,
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

// ==================== SteamParser ====================

/// Parses the Steam player-achievements JSON document.
///
/// Steam always reports an unlock flag, so entries are never
/// [`UnlockState::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteamParser;

impl AchievementParser for SteamParser {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn can_parse(&self, probe: &Value) -> bool {
        probe
            .get("playerstats")
            .and_then(|stats| stats.get("achievements"))
            .is_some_and(Value::is_array)
    }

    fn parse(&self, body: &str) -> Result<Vec<RawAchievement>, ParseError> {
        let response: SteamResponse =
            serde_json::from_str(body).map_err(|e| ParseError::invalid_json(PROVIDER, &e))?;
        let game_name = response.playerstats.game_name;

        let achievements: Vec<RawAchievement> = response
            .playerstats
            .achievements
            .into_iter()
            .map(|entry| {
                let name = entry
                    .name
                    .filter(|name| !name.is_empty())
                    .unwrap_or(entry.apiname);
                RawAchievement::new(
                    game_name.clone(),
                    name,
                    entry.description.unwrap_or_default(),
                    UnlockState::from(entry.achieved == 1),
                )
            })
            .collect();

        debug!(count = achievements.len(), game = %game_name, "Parsed Steam achievements");
        Ok(achievements)
    }
}
