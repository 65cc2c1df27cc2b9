//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur while parsing a subscription payload.
///
/// Parsing is deliberately tolerant: a malformed optional field is
/// normalized to its documented default instead of failing the parse.
/// The expiration timestamp is the single hard precondition, so this
/// enum has exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing or invalid expiration timestamp: {reason}")]
    MissingOrInvalidExpiration { reason: String },
}

impl ParseError {
    /// Creates a missing-or-invalid-expiration error.
    pub fn missing_or_invalid_expiration(reason: impl Into<String>) -> Self {
        ParseError::MissingOrInvalidExpiration {
            reason: reason.into(),
        }
    }
}
