//! Typed program identifiers
//!
//! An [`Identifier`] is a single addressing atom: a type tag plus a 64-bit
//! value whose interpretation depends on the type. Frequencies are carried in
//! kHz. HD Radio station ids are carried in the extended layout described on
//! [`IdentifierType::HdStationIdExt`].

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::SelectorError;

/// Highest HD Radio subchannel index (HD1..HD8 map to 0..=7)
pub const MAX_HD_SUB_CHANNEL: u32 = 7;

const HD_STATION_ID_BITS: u32 = 32;
const HD_SUB_CHANNEL_OFFSET: u32 = 32;
const HD_SUB_CHANNEL_MASK: u64 = 0xF;
const HD_FREQUENCY_OFFSET: u32 = 36;
const HD_FREQUENCY_MASK: u64 = 0x3FFFF;

/// First and last codes reserved for vendor-specific identifier types
pub const VENDOR_START: i32 = 1000;
pub const VENDOR_END: i32 = 1999;

/// Kind of addressing information an [`Identifier`] carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdentifierType {
    /// Placeholder for an unset identifier; never valid in a selector
    Invalid,
    /// AM or FM carrier frequency in kHz
    AmFmFrequencyKhz,
    /// 16-bit RDS/RBDS program identification code
    RdsPi,
    /// HD Radio station id, extended with subchannel and frequency
    ///
    /// Bits 0..32 hold the station id, bits 32..36 the subchannel index and
    /// bits 36..54 the frequency in kHz.
    HdStationIdExt,
    /// HD Radio station name, packed ASCII
    HdStationName,
    /// HD Radio subchannel index (0..=7)
    HdSubchannel,
    /// Carrier frequency of an HD Radio broadcast in kHz
    HdFrequencyKhz,
    /// DAB service id, extended with ECC
    DabSidExt,
    /// DAB ensemble id
    DabEnsemble,
    /// DAB service component id
    DabScid,
    /// DAB ensemble frequency in kHz
    DabFrequencyKhz,
    /// Digital Radio Mondiale service id
    DrmoServiceId,
    /// Digital Radio Mondiale frequency in kHz
    DrmoFrequencyKhz,
    /// SiriusXM service id
    SxmServiceId,
    /// SiriusXM channel number
    SxmChannel,
    /// HD Radio station location (packed latitude/longitude)
    HdStationLocation,
    /// Vendor-specific identifier type, code in 1000..=1999
    Vendor(i32),
}

impl IdentifierType {
    /// Stable integer code for this type
    pub fn code(&self) -> i32 {
        match self {
            Self::Invalid => 0,
            Self::AmFmFrequencyKhz => 1,
            Self::RdsPi => 2,
            Self::HdStationIdExt => 3,
            Self::HdStationName => 4,
            Self::DabSidExt => 5,
            Self::DabEnsemble => 6,
            Self::DabScid => 7,
            Self::DabFrequencyKhz => 8,
            Self::DrmoServiceId => 9,
            Self::DrmoFrequencyKhz => 10,
            Self::SxmServiceId => 12,
            Self::SxmChannel => 13,
            Self::HdStationLocation => 15,
            Self::HdSubchannel => 16,
            Self::HdFrequencyKhz => 17,
            Self::Vendor(code) => *code,
        }
    }

    /// Resolve a type from its integer code
    pub fn from_code(code: i32) -> Result<Self, SelectorError> {
        Ok(match code {
            0 => Self::Invalid,
            1 => Self::AmFmFrequencyKhz,
            2 => Self::RdsPi,
            3 => Self::HdStationIdExt,
            4 => Self::HdStationName,
            5 => Self::DabSidExt,
            6 => Self::DabEnsemble,
            7 => Self::DabScid,
            8 => Self::DabFrequencyKhz,
            9 => Self::DrmoServiceId,
            10 => Self::DrmoFrequencyKhz,
            12 => Self::SxmServiceId,
            13 => Self::SxmChannel,
            15 => Self::HdStationLocation,
            16 => Self::HdSubchannel,
            17 => Self::HdFrequencyKhz,
            VENDOR_START..=VENDOR_END => Self::Vendor(code),
            other => return Err(SelectorError::UnknownIdentifierType(other)),
        })
    }

    /// Build a vendor-specific type, rejecting codes outside the vendor range
    pub fn vendor(code: i32) -> Result<Self, SelectorError> {
        if (VENDOR_START..=VENDOR_END).contains(&code) {
            Ok(Self::Vendor(code))
        } else {
            Err(SelectorError::invalid(format!(
                "vendor identifier type {code} outside {VENDOR_START}..={VENDOR_END}"
            )))
        }
    }

    /// Returns a human-readable name for the type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::AmFmFrequencyKhz => "AMFM_FREQUENCY_KHZ",
            Self::RdsPi => "RDS_PI",
            Self::HdStationIdExt => "HD_STATION_ID_EXT",
            Self::HdStationName => "HD_STATION_NAME",
            Self::HdSubchannel => "HD_SUBCHANNEL",
            Self::HdFrequencyKhz => "HD_FREQUENCY_KHZ",
            Self::DabSidExt => "DAB_SID_EXT",
            Self::DabEnsemble => "DAB_ENSEMBLE",
            Self::DabScid => "DAB_SCID",
            Self::DabFrequencyKhz => "DAB_FREQUENCY_KHZ",
            Self::DrmoServiceId => "DRMO_SERVICE_ID",
            Self::DrmoFrequencyKhz => "DRMO_FREQUENCY_KHZ",
            Self::SxmServiceId => "SXM_SERVICE_ID",
            Self::SxmChannel => "SXM_CHANNEL",
            Self::HdStationLocation => "HD_STATION_LOCATION",
            Self::Vendor(_) => "VENDOR",
        }
    }

    /// Returns whether values of this type are frequencies in kHz
    pub fn is_frequency(&self) -> bool {
        matches!(
            self,
            Self::AmFmFrequencyKhz
                | Self::HdFrequencyKhz
                | Self::DabFrequencyKhz
                | Self::DrmoFrequencyKhz
        )
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor(code) => write!(f, "VENDOR({code})"),
            other => f.write_str(other.name()),
        }
    }
}

/// AM/FM broadcast band a frequency falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Band {
    /// AM long wave
    AmLw,
    /// AM medium wave
    AmMw,
    /// AM short wave
    AmSw,
    /// FM broadcast
    Fm,
}

impl Band {
    /// All bands, lowest frequency first
    pub const ALL: [Band; 4] = [Band::AmLw, Band::AmMw, Band::AmSw, Band::Fm];

    /// Widest plausible frequency range of the band in kHz
    pub fn range_khz(&self) -> RangeInclusive<u32> {
        match self {
            Self::AmLw => 150..=283,
            Self::AmMw => 504..=1710,
            Self::AmSw => 1710..=30_000,
            Self::Fm => 65_000..=108_000,
        }
    }

    /// Classify a frequency; the lower band wins on a shared edge
    pub fn of(frequency_khz: u32) -> Option<Band> {
        Self::ALL
            .into_iter()
            .find(|band| band.range_khz().contains(&frequency_khz))
    }

    /// Returns whether this is one of the AM bands
    pub fn is_am(&self) -> bool {
        !matches!(self, Self::Fm)
    }
}

/// A single typed identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    /// What the value means
    pub id_type: IdentifierType,
    /// Raw value
    pub value: u64,
}

impl Identifier {
    /// Create an identifier without validating the value
    pub const fn new(id_type: IdentifierType, value: u64) -> Self {
        Self { id_type, value }
    }

    /// AM/FM frequency identifier; the frequency must fall in a known band
    pub fn amfm_frequency(frequency_khz: u32) -> Result<Self, SelectorError> {
        check_amfm_frequency(frequency_khz)?;
        Ok(Self::new(
            IdentifierType::AmFmFrequencyKhz,
            u64::from(frequency_khz),
        ))
    }

    /// HD Radio extended station id
    pub fn hd_station_id_ext(
        station_id: u64,
        sub_channel: u32,
        frequency_khz: u32,
    ) -> Result<Self, SelectorError> {
        if station_id == 0 {
            return Err(SelectorError::invalid("HD station id must be non-zero"));
        }
        if station_id >> HD_STATION_ID_BITS != 0 {
            return Err(SelectorError::invalid(format!(
                "HD station id {station_id:#x} does not fit in {HD_STATION_ID_BITS} bits"
            )));
        }
        check_hd_sub_channel(sub_channel)?;
        check_amfm_frequency(frequency_khz)?;

        let value = station_id
            | (u64::from(sub_channel) << HD_SUB_CHANNEL_OFFSET)
            | (u64::from(frequency_khz) << HD_FREQUENCY_OFFSET);
        Ok(Self::new(IdentifierType::HdStationIdExt, value))
    }

    /// Frequency of an HD Radio broadcast
    pub fn hd_frequency(frequency_khz: u32) -> Result<Self, SelectorError> {
        check_amfm_frequency(frequency_khz)?;
        Ok(Self::new(
            IdentifierType::HdFrequencyKhz,
            u64::from(frequency_khz),
        ))
    }

    /// HD Radio subchannel index
    pub fn hd_sub_channel(sub_channel: u32) -> Result<Self, SelectorError> {
        check_hd_sub_channel(sub_channel)?;
        Ok(Self::new(IdentifierType::HdSubchannel, u64::from(sub_channel)))
    }

    /// RDS program identification code
    pub fn rds_pi(pi: u16) -> Self {
        Self::new(IdentifierType::RdsPi, u64::from(pi))
    }

    /// Check that the value is meaningful for the type
    pub fn validate(&self) -> Result<(), SelectorError> {
        match self.id_type {
            IdentifierType::Invalid => Err(SelectorError::invalid("identifier type is INVALID")),
            IdentifierType::AmFmFrequencyKhz | IdentifierType::HdFrequencyKhz => {
                check_amfm_frequency(narrow_frequency(self.value)?)
            }
            IdentifierType::HdSubchannel => {
                let sub_channel = u32::try_from(self.value).map_err(|_| {
                    SelectorError::invalid(format!("HD subchannel {} out of range", self.value))
                })?;
                check_hd_sub_channel(sub_channel)
            }
            IdentifierType::HdStationIdExt => {
                let decoded = Self::hd_station_id_ext(
                    self.value & ((1 << HD_STATION_ID_BITS) - 1),
                    ((self.value >> HD_SUB_CHANNEL_OFFSET) & HD_SUB_CHANNEL_MASK) as u32,
                    ((self.value >> HD_FREQUENCY_OFFSET) & HD_FREQUENCY_MASK) as u32,
                )?;
                if decoded.value != self.value {
                    return Err(SelectorError::invalid(format!(
                        "HD station id ext {:#x} has reserved bits set",
                        self.value
                    )));
                }
                Ok(())
            }
            IdentifierType::RdsPi if self.value > u64::from(u16::MAX) => Err(
                SelectorError::invalid(format!("RDS PI {:#x} exceeds 16 bits", self.value)),
            ),
            IdentifierType::DabFrequencyKhz | IdentifierType::DrmoFrequencyKhz
                if self.value == 0 =>
            {
                Err(SelectorError::invalid(format!(
                    "{} must be non-zero",
                    self.id_type
                )))
            }
            IdentifierType::Vendor(code) => IdentifierType::vendor(code).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Station id part of an HD extended station id
    pub fn hd_station_id(&self) -> Option<u64> {
        self.is_hd_station()
            .then(|| self.value & ((1 << HD_STATION_ID_BITS) - 1))
    }

    /// Subchannel part of an HD extended station id
    pub fn hd_sub_channel_index(&self) -> Option<u32> {
        self.is_hd_station()
            .then(|| ((self.value >> HD_SUB_CHANNEL_OFFSET) & HD_SUB_CHANNEL_MASK) as u32)
    }

    /// Frequency part of an HD extended station id
    pub fn hd_frequency_khz(&self) -> Option<u32> {
        self.is_hd_station()
            .then(|| ((self.value >> HD_FREQUENCY_OFFSET) & HD_FREQUENCY_MASK) as u32)
    }

    fn is_hd_station(&self) -> bool {
        self.id_type == IdentifierType::HdStationIdExt
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id_type.is_frequency() || self.id_type == IdentifierType::HdSubchannel {
            write!(f, "{}={}", self.id_type, self.value)
        } else {
            write!(f, "{}={:#x}", self.id_type, self.value)
        }
    }
}

fn narrow_frequency(value: u64) -> Result<u32, SelectorError> {
    u32::try_from(value)
        .map_err(|_| SelectorError::invalid(format!("frequency {value} kHz out of range")))
}

fn check_amfm_frequency(frequency_khz: u32) -> Result<(), SelectorError> {
    if Band::of(frequency_khz).is_none() {
        return Err(SelectorError::invalid(format!(
            "frequency {frequency_khz} kHz is outside every AM/FM band"
        )));
    }
    Ok(())
}

fn check_hd_sub_channel(sub_channel: u32) -> Result<(), SelectorError> {
    if sub_channel > MAX_HD_SUB_CHANNEL {
        return Err(SelectorError::invalid(format!(
            "HD subchannel {sub_channel} exceeds {MAX_HD_SUB_CHANNEL}"
        )));
    }
    Ok(())
}
