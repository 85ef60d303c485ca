//! Error types for identifier and selector construction

use thiserror::Error;

/// Errors that can occur while building identifiers or selectors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Construction input is malformed or out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Identifier type code does not name a known type
    #[error("unknown identifier type code: {0}")]
    UnknownIdentifierType(i32),
}

impl SelectorError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
