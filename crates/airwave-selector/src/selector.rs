//! Composite program selectors
//!
//! A [`ProgramSelector`] is the stable identity of one tunable program: a
//! primary identifier that fixes the broadcast technology, plus secondary
//! identifiers that let the same program be found through other
//! representations (the analog frequency of an HD station, an RDS PI, ...).
//!
//! Equality ignores the order of secondary identifiers. Whether two selectors
//! denote the same program is a separate question answered by
//! [`crate::matching::selectors_match`].

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::SelectorError;
use crate::identifier::{Identifier, IdentifierType};

/// Broadcast technology class, derived from the primary identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Technology {
    /// Analog AM/FM
    AmFm,
    /// HD Radio digital
    Hd,
    /// Digital Audio Broadcasting
    Dab,
    /// Digital Radio Mondiale
    Drmo,
    /// SiriusXM satellite
    Sxm,
    /// Vendor-specific addressing
    Vendor,
}

impl Technology {
    /// Technology addressed by a primary identifier of the given type
    pub fn of_primary(id_type: IdentifierType) -> Option<Self> {
        match id_type {
            IdentifierType::AmFmFrequencyKhz | IdentifierType::RdsPi => Some(Self::AmFm),
            IdentifierType::HdStationIdExt => Some(Self::Hd),
            IdentifierType::DabSidExt => Some(Self::Dab),
            IdentifierType::DrmoServiceId => Some(Self::Drmo),
            IdentifierType::SxmServiceId | IdentifierType::SxmChannel => Some(Self::Sxm),
            IdentifierType::Vendor(_) => Some(Self::Vendor),
            _ => None,
        }
    }

    /// Returns whether a secondary identifier of this type fits the technology
    pub fn accepts_secondary(&self, id_type: IdentifierType) -> bool {
        use IdentifierType as T;

        if matches!(id_type, T::Vendor(_)) {
            return true;
        }
        match self {
            Self::AmFm => matches!(
                id_type,
                T::AmFmFrequencyKhz
                    | T::RdsPi
                    | T::HdStationIdExt
                    | T::HdStationName
                    | T::HdStationLocation
            ),
            Self::Hd => matches!(
                id_type,
                T::HdFrequencyKhz
                    | T::HdSubchannel
                    | T::HdStationName
                    | T::HdStationLocation
                    | T::RdsPi
            ),
            Self::Dab => matches!(
                id_type,
                T::DabEnsemble | T::DabScid | T::DabFrequencyKhz
            ),
            Self::Drmo => matches!(id_type, T::DrmoFrequencyKhz),
            Self::Sxm => matches!(id_type, T::SxmServiceId | T::SxmChannel),
            Self::Vendor => !matches!(id_type, T::Invalid),
        }
    }
}

/// Composite identity of one tunable program
///
/// Deserialization goes through [`ProgramSelector::with_secondaries`], so a
/// decoded selector obeys the same rules as one built by the factories.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSelector"))]
pub struct ProgramSelector {
    primary_id: Identifier,
    secondary_ids: Vec<Identifier>,
}

/// Wire shape of a selector before validation
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSelector {
    primary_id: Identifier,
    #[serde(default)]
    secondary_ids: Vec<Identifier>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSelector> for ProgramSelector {
    type Error = SelectorError;

    fn try_from(raw: RawSelector) -> Result<Self, Self::Error> {
        Self::with_secondaries(raw.primary_id, raw.secondary_ids)
    }
}

impl ProgramSelector {
    /// Create a selector from a validated primary identifier
    pub fn new(primary_id: Identifier) -> Result<Self, SelectorError> {
        primary_id.validate()?;
        if Technology::of_primary(primary_id.id_type).is_none() {
            return Err(SelectorError::invalid(format!(
                "{} cannot be a primary identifier",
                primary_id.id_type
            )));
        }
        Ok(Self {
            primary_id,
            secondary_ids: Vec::new(),
        })
    }

    /// Create a selector from a primary and secondary identifiers
    pub fn with_secondaries(
        primary_id: Identifier,
        secondary_ids: impl IntoIterator<Item = Identifier>,
    ) -> Result<Self, SelectorError> {
        secondary_ids
            .into_iter()
            .try_fold(Self::new(primary_id)?, |sel, id| sel.with_secondary(id))
    }

    /// Append a secondary identifier, checking it fits the selector's technology
    pub fn with_secondary(mut self, id: Identifier) -> Result<Self, SelectorError> {
        id.validate()?;
        if !self.technology().accepts_secondary(id.id_type) {
            return Err(SelectorError::invalid(format!(
                "{} is not a valid secondary identifier for a {:?} selector",
                id.id_type,
                self.technology()
            )));
        }
        self.check_hd_consistency(&id)?;
        if !self.secondary_ids.contains(&id) {
            self.secondary_ids.push(id);
        }
        Ok(self)
    }

    /// The primary identifier
    pub fn primary_id(&self) -> &Identifier {
        &self.primary_id
    }

    /// Secondary identifiers, in the order they were added
    pub fn secondary_ids(&self) -> &[Identifier] {
        &self.secondary_ids
    }

    /// Primary followed by all secondary identifiers
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        std::iter::once(&self.primary_id).chain(self.secondary_ids.iter())
    }

    /// Distinct identifier types carried by the selector
    pub fn identifier_types(&self) -> BTreeSet<IdentifierType> {
        self.identifiers().map(|id| id.id_type).collect()
    }

    /// Broadcast technology class of the selector
    pub fn technology(&self) -> Technology {
        // Guaranteed by construction
        Technology::of_primary(self.primary_id.id_type).unwrap_or(Technology::Vendor)
    }

    /// First value of the given type, primary first
    pub fn first_value_of(&self, id_type: IdentifierType) -> Option<u64> {
        self.identifiers()
            .find(|id| id.id_type == id_type)
            .map(|id| id.value)
    }

    /// Carrier frequency in kHz, if the selector carries one
    pub fn frequency_khz(&self) -> Option<u32> {
        if let Some(khz) = self.primary_id.hd_frequency_khz() {
            return Some(khz);
        }
        self.identifiers()
            .find(|id| id.id_type.is_frequency())
            .and_then(|id| u32::try_from(id.value).ok())
    }

    /// HD subchannel index, if this is an HD selector
    pub fn hd_sub_channel(&self) -> Option<u32> {
        self.primary_id.hd_sub_channel_index()
    }

    fn check_hd_consistency(&self, id: &Identifier) -> Result<(), SelectorError> {
        let (Some(freq), Some(sub)) = (
            self.primary_id.hd_frequency_khz(),
            self.primary_id.hd_sub_channel_index(),
        ) else {
            return Ok(());
        };
        let conflicts = match id.id_type {
            IdentifierType::HdFrequencyKhz => id.value != u64::from(freq),
            IdentifierType::HdSubchannel => id.value != u64::from(sub),
            _ => false,
        };
        if conflicts {
            return Err(SelectorError::invalid(format!(
                "{id} disagrees with primary {}",
                self.primary_id
            )));
        }
        Ok(())
    }

    fn sorted_secondaries(&self) -> Vec<Identifier> {
        let mut ids = self.secondary_ids.clone();
        ids.sort();
        ids
    }
}

impl PartialEq for ProgramSelector {
    fn eq(&self, other: &Self) -> bool {
        self.primary_id == other.primary_id
            && self.secondary_ids.len() == other.secondary_ids.len()
            && self.sorted_secondaries() == other.sorted_secondaries()
    }
}

impl Eq for ProgramSelector {}

impl Hash for ProgramSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.primary_id.hash(state);
    }
}

impl fmt::Display for ProgramSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary_id)?;
        if !self.secondary_ids.is_empty() {
            let secondaries: Vec<String> =
                self.secondary_ids.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", secondaries.join(", "))?;
        }
        Ok(())
    }
}

/// Selector for an analog AM/FM station
pub fn make_amfm_selector(frequency_khz: u32) -> Result<ProgramSelector, SelectorError> {
    ProgramSelector::new(Identifier::amfm_frequency(frequency_khz)?)
}

/// Selector for an HD Radio subchannel
///
/// The primary identifier is the extended station id. The raw frequency and
/// subchannel are repeated as secondary identifiers so that analog queries for
/// the same carrier find the digital program.
pub fn make_hd_selector(
    station_id: u64,
    sub_channel: u32,
    frequency_khz: u32,
) -> Result<ProgramSelector, SelectorError> {
    ProgramSelector::with_secondaries(
        Identifier::hd_station_id_ext(station_id, sub_channel, frequency_khz)?,
        [
            Identifier::hd_frequency(frequency_khz)?,
            Identifier::hd_sub_channel(sub_channel)?,
        ],
    )
}

/// Selector for a DAB service
pub fn make_dab_selector(
    sid_ext: u64,
    ensemble: u64,
    frequency_khz: u32,
) -> Result<ProgramSelector, SelectorError> {
    if sid_ext == 0 {
        return Err(SelectorError::invalid("DAB service id must be non-zero"));
    }
    if frequency_khz == 0 {
        return Err(SelectorError::invalid("DAB frequency must be non-zero"));
    }
    ProgramSelector::with_secondaries(
        Identifier::new(IdentifierType::DabSidExt, sid_ext),
        [
            Identifier::new(IdentifierType::DabEnsemble, ensemble),
            Identifier::new(IdentifierType::DabFrequencyKhz, u64::from(frequency_khz)),
        ],
    )
}
