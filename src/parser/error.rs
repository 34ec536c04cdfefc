//! Error types for provider payload parsing.

use thiserror::Error;

/// Errors that can occur while decoding a provider payload.
///
/// [`ParseError::Decode`] means the payload could not be read as the expected
/// document at all; [`ParseError::MissingKey`] and [`ParseError::Schema`] mean
/// the document decoded but its structure is not what the provider promises.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Payload is not valid JSON or the expected document could not be found
    #[error("{provider} payload could not be decoded: {reason}\n  Suggestion: {suggestion}")]
    Decode {
        /// Provider whose payload failed
        provider: &'static str,
        /// Why decoding failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// A required key is absent from an otherwise valid document
    #[error("{provider} achievement #{index} is missing required key '{key}'")]
    MissingKey {
        /// Provider whose payload failed
        provider: &'static str,
        /// Name of the missing key
        key: &'static str,
        /// Position of the offending entry
        index: usize,
    },

    /// An entry has an unexpected shape inside an otherwise valid document
    #[error("{provider} achievement #{index} has an unexpected shape: {reason}")]
    Schema {
        /// Provider whose payload failed
        provider: &'static str,
        /// Position of the offending entry
        index: usize,
        /// What did not match
        reason: String,
    },
}

impl ParseError {
    /// Creates a `Decode` error from a JSON decoding failure.
    #[must_use]
    pub fn invalid_json(provider: &'static str, error: &serde_json::Error) -> Self {
        Self::Decode {
            provider,
            reason: error.to_string(),
            suggestion: "Check that the endpoint returns the provider's achievement document"
                .to_string(),
        }
    }

    /// Creates a `Decode` error for a page without an embedded achievements assignment.
    #[must_use]
    pub fn assignment_not_found(provider: &'static str) -> Self {
        Self::Decode {
            provider,
            reason: "no `<namespace>.achievements=[...];` assignment found".to_string(),
            suggestion: "Check the profile URL and that the profile is public".to_string(),
        }
    }

    /// Returns true for the schema-level kinds (`MissingKey` and `Schema`).
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::Schema { .. })
    }
}
