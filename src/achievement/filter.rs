//! Unlock-status filter applied to freshly retrieved achievements.

use std::fmt;

use super::RawAchievement;

/// Which achievements to keep, selected by the configured unlock flag.
///
/// Unknown unlock status is treated as "not unlocked", so
/// [`UnlockFilter::Locked`] keeps both locked and unknown entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlockFilter {
    /// No filtering (flag unset).
    #[default]
    All,
    /// Keep only explicitly unlocked achievements (flag `true`).
    Unlocked,
    /// Keep everything that is not explicitly unlocked (flag `false`).
    Locked,
}

impl UnlockFilter {
    /// Token used in output file names for this mode.
    #[must_use]
    pub fn file_token(self) -> &'static str {
        match self {
            Self::All => "Achievements",
            Self::Unlocked => "UnlockedAchievements",
            Self::Locked => "LockedAchievements",
        }
    }

    /// Returns the config flag this mode corresponds to.
    #[must_use]
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Unlocked => Some(true),
            Self::Locked => Some(false),
        }
    }

    /// Returns true if the achievement passes this filter.
    #[must_use]
    pub fn keeps(self, achievement: &RawAchievement) -> bool {
        match self {
            Self::All => true,
            Self::Unlocked => achievement.unlock.is_unlocked(),
            Self::Locked => !achievement.unlock.is_unlocked(),
        }
    }

    /// Filters achievements, preserving input order.
    #[must_use]
    pub fn apply(self, achievements: Vec<RawAchievement>) -> Vec<RawAchievement> {
        if self == Self::All {
            return achievements;
        }
        achievements
            .into_iter()
            .filter(|achievement| self.keeps(achievement))
            .collect()
    }
}

impl From<Option<bool>> for UnlockFilter {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => Self::All,
            Some(true) => Self::Unlocked,
            Some(false) => Self::Locked,
        }
    }
}

impl fmt::Display for UnlockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_token())
    }
}
