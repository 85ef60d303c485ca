//! Selector matching rules
//!
//! Program identity is not structural equality. Two selectors denote the same
//! program when the primary identifier of one overlaps the primary or any
//! secondary identifier of the other. Identifiers overlap when their match
//! keys are equal; the only alias is the analog/digital co-location of an
//! AM/FM frequency with the carrier frequency of an HD broadcast.
//!
//! Secondary identifiers are never compared with each other: two HD
//! subchannels on one carrier share a frequency secondary yet are distinct
//! programs.

use std::collections::{BTreeSet, HashSet};

use tracing::trace;

use crate::identifier::{Identifier, IdentifierType};
use crate::selector::ProgramSelector;

/// Canonical form used to decide whether two identifiers overlap
pub fn match_key(id: &Identifier) -> Identifier {
    Identifier::new(match_key_type(id.id_type), id.value)
}

/// Identifier type of the match key for identifiers of `id_type`
pub fn match_key_type(id_type: IdentifierType) -> IdentifierType {
    match id_type {
        IdentifierType::HdFrequencyKhz => IdentifierType::AmFmFrequencyKhz,
        other => other,
    }
}

/// Returns whether two identifiers address the same thing
pub fn identifiers_overlap(a: &Identifier, b: &Identifier) -> bool {
    match_key(a) == match_key(b)
}

/// Returns whether two selectors denote the same program
///
/// Symmetric: `selectors_match(a, b) == selectors_match(b, a)`.
pub fn selectors_match(a: &ProgramSelector, b: &ProgramSelector) -> bool {
    let matched = primary_overlaps(a, b) || primary_overlaps(b, a);
    if matched {
        trace!("selector {} matches {}", a, b);
    }
    matched
}

fn primary_overlaps(a: &ProgramSelector, b: &ProgramSelector) -> bool {
    b.identifiers()
        .any(|id| identifiers_overlap(a.primary_id(), id))
}

/// Positions of every candidate matching the query, in iteration order
pub fn matching_indices<'a>(
    candidates: impl IntoIterator<Item = &'a ProgramSelector>,
    query: &ProgramSelector,
) -> Vec<usize> {
    candidates
        .into_iter()
        .enumerate()
        .filter(|(_, sel)| selectors_match(sel, query))
        .map(|(idx, _)| idx)
        .collect()
}

/// Constant-time membership check against an advertised type set
pub fn is_identifier_type_supported(
    supported: &HashSet<IdentifierType>,
    id_type: IdentifierType,
) -> bool {
    supported.contains(&id_type)
}

/// Returns whether a query of `id_type` can overlap an identifier of an advertised type
///
/// A bare AM/FM frequency finds HD programs through their carrier frequency,
/// so it is answerable whenever `HdFrequencyKhz` is advertised.
pub fn is_identifier_type_queryable(
    supported: &HashSet<IdentifierType>,
    id_type: IdentifierType,
) -> bool {
    let key = match_key_type(id_type);
    is_identifier_type_supported(supported, id_type)
        || supported.iter().any(|&t| match_key_type(t) == key)
}

/// Restricts a program list query
///
/// An empty set means no restriction on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramFilter {
    /// Keep programs carrying at least one identifier of these types
    pub identifier_types: BTreeSet<IdentifierType>,
    /// Keep programs carrying an identifier overlapping one of these
    pub identifiers: Vec<Identifier>,
}

impl ProgramFilter {
    /// Filter that lets every program through
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on identifier types only
    pub fn with_types(types: impl IntoIterator<Item = IdentifierType>) -> Self {
        Self {
            identifier_types: types.into_iter().collect(),
            identifiers: Vec::new(),
        }
    }

    /// Filter on identifiers only
    pub fn with_identifiers(ids: impl IntoIterator<Item = Identifier>) -> Self {
        Self {
            identifier_types: BTreeSet::new(),
            identifiers: ids.into_iter().collect(),
        }
    }

    /// Returns whether the selector passes the filter
    pub fn accepts(&self, selector: &ProgramSelector) -> bool {
        let type_ok = self.identifier_types.is_empty()
            || selector
                .identifiers()
                .any(|id| self.identifier_types.contains(&id.id_type));
        let id_ok = self.identifiers.is_empty()
            || selector.identifiers().any(|id| {
                self.identifiers
                    .iter()
                    .any(|wanted| identifiers_overlap(id, wanted))
            });
        type_ok && id_ok
    }
}
