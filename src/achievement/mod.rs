//! Achievement data model, unlock filtering and DLC enrichment.
//!
//! Provider parsers produce [`RawAchievement`] values, the unlock filter
//! narrows them down, and [`enrich`] joins them with the
//! [`RequirementRecord`]s parsed from the game's data files to produce
//! [`EnrichedAchievement`] values, the only entity that gets persisted.

mod enrich;
mod filter;

pub use enrich::{enrich, index_requirements};
pub use filter::UnlockFilter;

use std::collections::BTreeSet;
use std::fmt;

/// Unlock status reported by a provider.
///
/// Some providers cannot report unlock status for every achievement, so the
/// absence of information is an explicit state instead of a nullable bool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlockState {
    /// The provider reported the achievement as unlocked.
    Unlocked,
    /// The provider reported the achievement as locked.
    Locked,
    /// The provider did not report an unlock status.
    #[default]
    Unknown,
}

impl UnlockState {
    /// Returns true only for an explicit [`UnlockState::Unlocked`].
    #[must_use]
    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }

    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unlocked => "unlocked",
            Self::Locked => "locked",
            Self::Unknown => "unknown",
        }
    }
}

impl From<bool> for UnlockState {
    fn from(value: bool) -> Self {
        if value { Self::Unlocked } else { Self::Locked }
    }
}

impl From<Option<bool>> for UnlockState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unknown, Self::from)
    }
}

impl fmt::Display for UnlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An achievement as decoded from a provider payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAchievement {
    /// Game the achievement belongs to; empty when the provider does not report it.
    pub game_name: String,
    /// Display name of the achievement.
    pub name: String,
    /// Display description of the achievement.
    pub description: String,
    /// Unlock status as reported by the provider.
    pub unlock: UnlockState,
}

impl RawAchievement {
    /// Creates a new raw achievement.
    #[must_use]
    pub fn new(
        game_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unlock: UnlockState,
    ) -> Self {
        Self {
            game_name: game_name.into(),
            name: name.into(),
            description: description.into(),
            unlock,
        }
    }
}

/// Condition keyword found inside a requirement group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequirementToken {
    /// `has_dlc` - the DLC marker.
    HasDlc,
    /// Any other condition keyword, kept verbatim.
    Other(String),
}

impl RequirementToken {
    /// Keyword used in structure files for the DLC marker.
    pub const HAS_DLC: &'static str = "has_dlc";

    /// Returns true when this token is the DLC marker.
    #[must_use]
    pub fn is_dlc(&self) -> bool {
        matches!(self, Self::HasDlc)
    }
}

impl From<&str> for RequirementToken {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case(Self::HAS_DLC) {
            Self::HasDlc
        } else {
            Self::Other(value.to_string())
        }
    }
}

/// One alternative inside a "requires one of" block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlcGroup {
    /// Condition keyword shared by every name in the group.
    pub marker: RequirementToken,
    /// Values listed under the keyword, in file order.
    pub names: Vec<String>,
}

impl DlcGroup {
    /// Creates a new group.
    #[must_use]
    pub fn new(marker: RequirementToken, names: Vec<String>) -> Self {
        Self { marker, names }
    }
}

/// DLC gating of a single achievement, keyed by achievement name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementRecord {
    /// Display name of the gated achievement.
    pub achievement_name: String,
    /// Every DLC listed here must be owned.
    pub requires_all_dlc: BTreeSet<String>,
    /// At least one entry of these groups must be satisfied.
    pub requires_one_of: Vec<DlcGroup>,
}

impl RequirementRecord {
    /// Creates an empty record for the given achievement.
    #[must_use]
    pub fn new(achievement_name: impl Into<String>) -> Self {
        Self {
            achievement_name: achievement_name.into(),
            ..Self::default()
        }
    }

    /// Names of the "one of" alternatives that are DLCs, in group order.
    #[must_use]
    pub fn one_of_dlc_names(&self) -> Vec<String> {
        self.requires_one_of
            .iter()
            .filter(|group| group.marker.is_dlc())
            .flat_map(|group| group.names.iter().cloned())
            .collect()
    }
}

/// An achievement joined with its DLC requirements, as written to the output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedAchievement {
    /// Whether the player has unlocked the achievement.
    pub achieved: bool,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Countries the achievement can be earned with.
    pub countries: BTreeSet<String>,
    /// True when any DLC is needed to earn the achievement.
    pub is_required_dlc: bool,
    /// DLCs that must all be owned.
    pub all_required_dlc_names: Vec<String>,
    /// DLCs of which at least one must be owned.
    pub one_required_of_dlc_names: Vec<String>,
}
