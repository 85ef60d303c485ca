//! Error types for the simulated station catalog

use airwave_selector::{ProgramSelector, SelectorError};
use thiserror::Error;

/// Errors raised while building a catalog
///
/// These indicate a misconfigured catalog and are not recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two entries denote the same program
    #[error("duplicate selector: {duplicate} matches already registered {existing}")]
    DuplicateSelector {
        /// Selector registered first
        existing: ProgramSelector,
        /// Selector that collided with it
        duplicate: ProgramSelector,
    },

    /// A catalog entry could not be turned into a selector
    #[error("invalid catalog entry {program:?}: {source}")]
    InvalidEntry {
        /// Program name of the offending entry
        program: String,
        /// Underlying selector error
        #[source]
        source: SelectorError,
    },
}

/// Outcome of a lookup that did not resolve to exactly one program
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No registered program matches
    #[error("no program matches {0}")]
    NotFound(ProgramSelector),

    /// More than one registered program matches; the caller must refine the selector
    #[error("{selector} matches {matches} programs")]
    Ambiguous {
        /// Query selector
        selector: ProgramSelector,
        /// Number of matching programs
        matches: usize,
    },
}
