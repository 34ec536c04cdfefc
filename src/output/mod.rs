//! Result files: naming, cache probing and the `;`-separated format.
//!
//! # Architecture
//!
//! - [`FilenameResolver`] - Deterministic file names and the cache pattern
//! - [`find_existing`] - Non-recursive probe of the output directory
//! - [`write_csv`] / [`read_csv`] - Result file writer and cache reader

mod cache;
mod csv;
mod filename;

pub use cache::{CacheLookup, CacheMiss, find_existing};
pub use csv::{
    ALL_REQUIRED_MARK, CsvContents, HEADER_COLUMNS, ONE_REQUIRED_MARK, read_csv, render_csv,
    write_csv,
};
pub use filename::{CSV_EXTENSION, FilenameResolver, UPDATED_SUFFIX};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing result files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// File or directory could not be read or written
    #[error("I/O error at '{path}': {source}\n  Suggestion: Check that the output directory exists and is writable")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Existing result file does not have the expected layout
    #[error("cached result file '{path}' is malformed: {reason}\n  Suggestion: Delete the file to fetch fresh data")]
    MalformedCache {
        /// Path of the cached file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
}
