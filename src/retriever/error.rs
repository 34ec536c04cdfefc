//! Error types for achievement retrieval.
//!
//! Non-success HTTP statuses are not errors: they are reported through
//! [`RetrievalResult`](super::RetrievalResult). Everything here either stops
//! a run before any request is sent or comes from the transport itself.

use thiserror::Error;

use crate::parser::ParseError;

/// Errors that can occur while retrieving achievements.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Required provider settings are missing; no request was sent
    #[error("invalid {provider} configuration: `{field}` is missing or empty\n  Suggestion: Set `{field}` in the `{provider}` section of the settings file")]
    Configuration {
        /// Provider section being validated
        provider: &'static str,
        /// Name of the missing field
        field: &'static str,
    },

    /// Provider selector is not one of the supported sources
    #[error("unsupported achievement source: {name}\n  Suggestion: Use one of: Steam, GoG")]
    UnsupportedSource {
        /// The rejected selector
        name: String,
    },

    /// Request URL could not be built
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL (or template) that failed
        url: String,
        /// Why it is invalid
        reason: String,
    },

    /// Request did not complete in time
    #[error("request to {url} timed out")]
    Timeout {
        /// The URL that timed out
        url: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, body read)
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The URL being requested
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client could not be constructed
    #[error("HTTP client construction failed for {provider}: {source}")]
    Client {
        /// Provider the client was built for
        provider: &'static str,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Response body could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl RetrieveError {
    /// Maps a request failure, keeping timeouts distinct.
    ///
    /// The URL is stripped from the client error; callers pass the URL they
    /// are willing to show.
    #[must_use]
    pub fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: source.without_url(),
            }
        }
    }

    /// Returns true for failures raised by the transport rather than by
    /// configuration or payload decoding.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::Timeout { .. } | Self::Transport { .. }
        )
    }
}
