//! GOG profile page parser.
//!
//! The profile page carries the achievement list as a script assignment:
//!
//! ```text
//! window.profilesData.achievements=[
//!   {"achievement": {"name": "...", "description": "...", "isUnlocked": false},
//!    "stats": {"46988761208093956": {"isUnlocked": true, "unlockDate": "..."}}},
//!   ...
//! ];
//! ```
//!
//! Unlock status comes from the first `stats` entry with an explicit
//! `isUnlocked`, then from `achievement.isUnlocked`, otherwise it is unknown.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::achievement::{RawAchievement, UnlockState};

use super::{AchievementParser, ParseError, extract_embedded_json};

const PROVIDER: &str = "gog";
const ACHIEVEMENT_KEY: &str = "achievement";
const STATS_KEY: &str = "stats";
const IS_UNLOCKED_KEY: &str = "isUnlocked";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GogAchievement {
    name: String,
    /// Hidden achievements may carry `null` here.
    #[serde(default)]
    description: Option<String>,
    is_unlocked: Option<bool>,
}

/// Parses GOG profile pages with an embedded achievements array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GogParser;

impl GogParser {
    /// Decodes an already extracted JSON array literal.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] if `literal` is not a JSON array,
    /// [`ParseError::MissingKey`] if an entry has no `achievement` object and
    /// [`ParseError::Schema`] if that object has the wrong shape.
    pub fn parse_array(&self, literal: &str) -> Result<Vec<RawAchievement>, ParseError> {
        let entries: Vec<Value> =
            serde_json::from_str(literal).map_err(|e| ParseError::invalid_json(PROVIDER, &e))?;

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_entry(index, entry))
            .collect()
    }
}

fn parse_entry(index: usize, entry: &Value) -> Result<RawAchievement, ParseError> {
    let Some(raw) = entry.get(ACHIEVEMENT_KEY) else {
        return Err(ParseError::MissingKey {
            provider: PROVIDER,
            key: ACHIEVEMENT_KEY,
            index,
        });
    };

    let achievement = GogAchievement::deserialize(raw).map_err(|e| ParseError::Schema {
        provider: PROVIDER,
        index,
        reason: e.to_string(),
    })?;

    let unlock = UnlockState::from(stats_unlock(entry.get(STATS_KEY)).or(achievement.is_unlocked));
    trace!(index, name = %achievement.name, unlock = %unlock, "Decoded GOG achievement");

    Ok(RawAchievement::new(
        String::new(),
        achievement.name,
        achievement.description.unwrap_or_default(),
        unlock,
    ))
}

/// First explicit `isUnlocked` among the stats entries, in document order.
fn stats_unlock(stats: Option<&Value>) -> Option<bool> {
    stats?
        .as_object()?
        .values()
        .find_map(|stat| stat.get(IS_UNLOCKED_KEY).and_then(Value::as_bool))
}

impl AchievementParser for GogParser {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn can_parse(&self, probe: &Value) -> bool {
        probe
            .as_array()
            .and_then(|entries| entries.first())
            .is_some_and(|first| first.get(ACHIEVEMENT_KEY).is_some())
    }

    fn parse(&self, body: &str) -> Result<Vec<RawAchievement>, ParseError> {
        let literal =
            extract_embedded_json(body).ok_or_else(|| ParseError::assignment_not_found(PROVIDER))?;
        let achievements = self.parse_array(literal)?;
        debug!(count = achievements.len(), "Parsed GOG achievements");
        Ok(achievements)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(array: &str) -> String {
        format!("window.profilesData.achievements={array};")
    }

    #[test]
    fn test_gog_can_parse_accepts_wrapper_array() {
        let probe = serde_json::json!([{"achievement": {"name": "A", "description": "D"}}]);
        assert!(GogParser.can_parse(&probe));
    }

    #[test]
    fn test_gog_can_parse_rejects_other_shapes() {
        let probe = serde_json::json!([{"invalidProperty": {"name": "A"}}]);
        assert!(!GogParser.can_parse(&probe));
        assert!(!GogParser.can_parse(&serde_json::json!([])));
        assert!(!GogParser.can_parse(&serde_json::json!({"achievement": {}})));
    }

    #[test]
    fn test_gog_parse_stats_win_over_achievement_flag() {
        let body = page(
            r#"[{"achievement":{"name":"Achievement 1","description":"Description 1","isUnlocked":false},"stats":{"11":{"isUnlocked":true}}}]"#,
        );
        let achievements = GogParser.parse(&body).unwrap();
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].name, "Achievement 1");
        assert_eq!(achievements[0].description, "Description 1");
        assert_eq!(achievements[0].unlock, UnlockState::Unlocked);
    }

    #[test]
    fn test_gog_parse_without_stats_uses_achievement_flag() {
        let body = page(
            r#"[{"achievement":{"name":"Achievement 1","description":"Description 1","isUnlocked":false}}]"#,
        );
        let achievements = GogParser.parse(&body).unwrap();
        assert_eq!(achievements[0].unlock, UnlockState::Locked);
    }

    #[test]
    fn test_gog_parse_first_explicit_stat_wins() {
        let body = page(
            r#"[{"achievement":{"name":"A","description":"D"},"stats":{"9":{"unlockDate":null},"2":{"isUnlocked":false},"1":{"isUnlocked":true}}}]"#,
        );
        let achievements = GogParser.parse(&body).unwrap();
        assert_eq!(achievements[0].unlock, UnlockState::Locked);
    }

    #[test]
    fn test_gog_parse_stats_without_flags_fall_back() {
        let body = page(
            r#"[{"achievement":{"name":"A","description":"D","isUnlocked":true},"stats":{"1":{"unlockDate":null}}}]"#,
        );
        assert_eq!(GogParser.parse(&body).unwrap()[0].unlock, UnlockState::Unlocked);
    }

    #[test]
    fn test_gog_parse_no_information_is_unknown() {
        let body = page(r#"[{"achievement":{"name":"A","description":"D"},"stats":{}}]"#);
        assert_eq!(GogParser.parse(&body).unwrap()[0].unlock, UnlockState::Unknown);
    }

    #[test]
    fn test_gog_parse_null_or_missing_description_is_empty() {
        let body = page(
            r#"[{"achievement":{"name":"Hidden","description":null}},{"achievement":{"name":"Bare"}}]"#,
        );
        let achievements = GogParser.parse(&body).unwrap();
        assert_eq!(achievements.len(), 2);
        assert_eq!(achievements[0].name, "Hidden");
        assert_eq!(achievements[0].description, "");
        assert_eq!(achievements[1].description, "");
    }

    #[test]
    fn test_gog_parse_missing_achievement_key_is_schema_error() {
        let body = page(
            r#"[{"invalidProperty":{"name":"name","description":"desc","isUnlocked":false}}]"#,
        );
        let err = GogParser.parse(&body).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingKey {
                key: "achievement",
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_gog_parse_without_assignment_is_decode_error() {
        let err = GogParser
            .parse(r#"[{"achievement": {"name": "Achievement 1", "description": "Description 1"}}]"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::Decode { .. }));
        assert!(!err.is_schema());
    }

    #[test]
    fn test_gog_parse_malformed_array_is_decode_error() {
        let err = GogParser
            .parse(r#"window.profilesData.achievements=[{achievement: 1}];"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::Decode { .. }));
    }

    #[test]
    fn test_gog_parse_wrong_inner_shape_is_schema_error() {
        let body = page(r#"[{"achievement":{"description":"no name"}}]"#);
        let err = GogParser.parse(&body).unwrap_err();
        assert!(matches!(err, ParseError::Schema { index: 0, .. }));
    }
}
