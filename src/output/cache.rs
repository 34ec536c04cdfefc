//! Probe of the output directory for a previous result file.
//!
//! Every failure here is a miss: the caller falls through to the network.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;

/// Why a cache probe found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMiss {
    /// No output directory was configured.
    NoDirectory,
    /// The output directory does not exist.
    DirectoryNotFound,
    /// The output directory could not be listed.
    Unreadable(String),
    /// The file name pattern is not a valid glob.
    InvalidPattern(String),
    /// No file matched the pattern.
    NoMatches,
}

impl fmt::Display for CacheMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDirectory => write!(f, "no output directory configured"),
            Self::DirectoryNotFound => write!(f, "output directory not found"),
            Self::Unreadable(reason) => write!(f, "output directory unreadable: {reason}"),
            Self::InvalidPattern(reason) => write!(f, "invalid file pattern: {reason}"),
            Self::NoMatches => write!(f, "no matching file"),
        }
    }
}

/// Result of [`find_existing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A matching file exists.
    Found(PathBuf),
    /// Nothing usable was found.
    NotFound(CacheMiss),
}

impl CacheLookup {
    /// Returns the matched path on a hit.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound(_) => None,
        }
    }
}

/// Looks for a file in `dir` (not recursively) whose name matches `pattern`.
///
/// When several files match, the lexicographically first name wins.
#[must_use]
pub fn find_existing(dir: &Path, pattern: &str) -> CacheLookup {
    let lookup = probe(dir, pattern);
    match &lookup {
        CacheLookup::Found(path) => debug!(path = %path.display(), "Cache hit"),
        CacheLookup::NotFound(reason) => {
            debug!(dir = %dir.display(), pattern, reason = %reason, "Cache miss");
        }
    }
    lookup
}

fn probe(dir: &Path, pattern: &str) -> CacheLookup {
    if dir.as_os_str().is_empty() {
        return CacheLookup::NotFound(CacheMiss::NoDirectory);
    }
    if !dir.is_dir() {
        return CacheLookup::NotFound(CacheMiss::DirectoryNotFound);
    }
    let matcher = match Pattern::new(pattern) {
        Ok(matcher) => matcher,
        Err(e) => return CacheLookup::NotFound(CacheMiss::InvalidPattern(e.to_string())),
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return CacheLookup::NotFound(CacheMiss::Unreadable(e.to_string())),
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| matcher.matches(name))
        })
        .map(|entry| entry.path())
        .collect();
    matches.sort();

    match matches.into_iter().next() {
        Some(path) => CacheLookup::Found(path),
        None => CacheLookup::NotFound(CacheMiss::NoMatches),
    }
}
