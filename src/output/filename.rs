//! Deterministic output file naming.
//!
//! Names follow `"{source} {token} {game}{suffix}{extension}"`, for example
//! `Steam UnlockedAchievements Portal 2.csv`. The same resolver produces the
//! cache probe pattern by using `*` as the game name.

use std::path::{Component, Path, PathBuf};

use crate::achievement::UnlockFilter;
use crate::retriever::AchievementSource;

/// Extension of result files.
pub const CSV_EXTENSION: &str = ".csv";
/// Suffix of the second write pass.
pub const UPDATED_SUFFIX: &str = "_updated";

const WILDCARD: &str = "*";

/// Resolves result file names for one provider and filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameResolver {
    source: AchievementSource,
    filter: UnlockFilter,
}

impl FilenameResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(source: AchievementSource, filter: UnlockFilter) -> Self {
        Self { source, filter }
    }

    /// Filter mode the names are built for.
    #[must_use]
    pub fn filter(&self) -> UnlockFilter {
        self.filter
    }

    fn prefix(&self) -> String {
        format!("{} {} ", self.source.as_str(), self.filter.file_token())
    }

    /// Builds a file name; invalid characters in `game_name` become `_`.
    #[must_use]
    pub fn file_name(&self, game_name: &str, extension: &str, suffix: &str) -> String {
        format!(
            "{}{}{suffix}{extension}",
            self.prefix(),
            sanitize_filename(game_name)
        )
    }

    /// Builds a `.csv` file name.
    #[must_use]
    pub fn csv_file_name(&self, game_name: &str, suffix: &str) -> String {
        self.file_name(game_name, CSV_EXTENSION, suffix)
    }

    /// Glob pattern matching any game's result file for this mode.
    #[must_use]
    pub fn cache_pattern(&self) -> String {
        format!("{}{WILDCARD}{CSV_EXTENSION}", self.prefix())
    }

    /// Full path of the `.csv` result file inside `dir`.
    #[must_use]
    pub fn full_path(&self, dir: &Path, game_name: &str, suffix: &str) -> PathBuf {
        dir.join(self.csv_file_name(game_name, suffix))
    }

    /// Recovers the game name from a result file path written by this resolver.
    ///
    /// Any [`UPDATED_SUFFIX`] is stripped as well.
    #[must_use]
    pub fn game_name_from(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let game = name
            .strip_prefix(&self.prefix())?
            .strip_suffix(CSV_EXTENSION)?;
        let game = game.strip_suffix(UPDATED_SUFFIX).unwrap_or(game);
        (!game.is_empty()).then(|| game.to_string())
    }
}

/// Sanitizes a game name for use inside a file name.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKENS: [&str; 3] = ["Achievements", "UnlockedAchievements", "LockedAchievements"];

    #[test]
    fn test_file_name_matches_known_layouts() {
        let steam_all = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::All);
        assert_eq!(
            steam_all.csv_file_name("HalfLife", ""),
            "Steam Achievements HalfLife.csv"
        );

        let gog_unlocked = FilenameResolver::new(AchievementSource::Gog, UnlockFilter::Unlocked);
        assert_eq!(
            gog_unlocked.csv_file_name("Witcher3", ""),
            "GoG UnlockedAchievements Witcher3.csv"
        );

        let steam_locked = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::Locked);
        assert_eq!(
            steam_locked.csv_file_name("Portal2", ""),
            "Steam LockedAchievements Portal2.csv"
        );
    }

    #[test]
    fn test_file_name_contains_exactly_one_token_per_mode() {
        for (filter, expected) in [
            (UnlockFilter::All, "Achievements"),
            (UnlockFilter::Unlocked, "UnlockedAchievements"),
            (UnlockFilter::Locked, "LockedAchievements"),
        ] {
            let name = FilenameResolver::new(AchievementSource::Steam, filter)
                .csv_file_name("Some Game", "");
            let token = name.split(' ').nth(1).unwrap();
            assert_eq!(token, expected);
            let matching = TOKENS.iter().filter(|t| name.split(' ').any(|w| w == **t));
            assert_eq!(matching.count(), 1, "{name}");
        }
    }

    #[test]
    fn test_file_name_appends_suffix_before_extension() {
        let resolver = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::All);
        assert_eq!(
            resolver.csv_file_name("HalfLife", UPDATED_SUFFIX),
            "Steam Achievements HalfLife_updated.csv"
        );
        assert_eq!(
            resolver.file_name("HalfLife", ".txt", ""),
            "Steam Achievements HalfLife.txt"
        );
    }

    #[test]
    fn test_cache_pattern_uses_wildcard_game() {
        let resolver = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::All);
        assert_eq!(resolver.cache_pattern(), "Steam Achievements *.csv");
    }

    #[test]
    fn test_file_name_sanitizes_game_name() {
        let resolver = FilenameResolver::new(AchievementSource::Gog, UnlockFilter::All);
        assert_eq!(
            resolver.csv_file_name("Witcher 3: Wild/Hunt?", ""),
            "GoG Achievements Witcher 3_ Wild_Hunt_.csv"
        );
        assert_eq!(resolver.csv_file_name("..", ""), "GoG Achievements __.csv");
        assert_eq!(resolver.csv_file_name("", ""), "GoG Achievements _.csv");
    }

    #[test]
    fn test_full_path_joins_directory() {
        let resolver = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::Unlocked);
        assert_eq!(
            resolver.full_path(Path::new("/out"), "Portal 2", ""),
            PathBuf::from("/out/Steam UnlockedAchievements Portal 2.csv")
        );
    }

    #[test]
    fn test_game_name_from_round_trips_and_strips_updated() {
        let resolver = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::All);
        let path = resolver.full_path(Path::new("/out"), "Europa Universalis IV", "");
        assert_eq!(
            resolver.game_name_from(&path).as_deref(),
            Some("Europa Universalis IV")
        );
        let updated = resolver.full_path(Path::new("/out"), "HalfLife", UPDATED_SUFFIX);
        assert_eq!(resolver.game_name_from(&updated).as_deref(), Some("HalfLife"));
    }

    #[test]
    fn test_game_name_from_rejects_other_modes() {
        let all = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::All);
        let locked = FilenameResolver::new(AchievementSource::Steam, UnlockFilter::Locked);
        let path = locked.full_path(Path::new("/out"), "HalfLife", "");
        assert!(all.game_name_from(&path).is_none());
    }
}
