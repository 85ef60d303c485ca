//! Error types for the tuner facade

use airwave_selector::{IdentifierType, ProgramSelector, SelectorError};
use airwave_sim::{LookupError, RegistryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the tuner facade
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HalError {
    /// Malformed input
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] SelectorError),

    /// Catalog could not be built
    #[error("catalog error: {0}")]
    Registry(#[from] RegistryError),

    /// Valid query, nothing registered under it
    #[error("not found: {0}")]
    NotFound(String),

    /// Valid query matching several programs
    #[error("{selector} is ambiguous: {matches} programs match")]
    Ambiguous {
        /// Query selector
        selector: ProgramSelector,
        /// Number of matching programs
        matches: usize,
    },

    /// Catalog holds no programs
    #[error("catalog is empty")]
    EmptyCatalog,

    /// Identifier type is not advertised by the tuner
    #[error("identifier type {0} is not supported")]
    NotSupported(IdentifierType),

    /// Operation does not apply in the current tuner state
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<LookupError> for HalError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(selector) => Self::NotFound(selector.to_string()),
            LookupError::Ambiguous { selector, matches } => Self::Ambiguous { selector, matches },
        }
    }
}

impl HalError {
    /// Returns whether this is an ordinary query outcome rather than a misconfiguration
    pub fn is_query_outcome(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Ambiguous { .. })
    }

    /// Status code reported to the transport layer
    pub fn result(&self) -> ResultCode {
        match self {
            Self::InvalidParameter(_) | Self::NotFound(_) | Self::Ambiguous { .. } => {
                ResultCode::InvalidArguments
            }
            Self::Registry(_) | Self::EmptyCatalog => ResultCode::InternalError,
            Self::NotSupported(_) => ResultCode::NotSupported,
            Self::InvalidState(_) => ResultCode::InvalidState,
        }
    }
}

/// Status codes understood by the transport layer
///
/// The full set mirrors what a transport reports to clients. [`HalError::result`]
/// only produces the failure codes the simulated tuner can hit. Variants marked
/// transport only are set by the transport itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCode {
    /// Transport only: the call succeeded
    Ok,
    InternalError,
    InvalidArguments,
    InvalidState,
    NotSupported,
    /// Transport only: the operation did not complete in time
    Timeout,
    /// Transport only: the client cancelled the operation
    Canceled,
    /// Transport only: failure outside this crate
    UnknownError,
}
