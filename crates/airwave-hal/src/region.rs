//! Region configuration
//!
//! AM/FM capabilities (band ranges, FM de-emphasis, RDS variants) and the DAB
//! channel table. The narrow configuration is the baseline region default;
//! the full configuration discloses everything the tuner can do and always
//! contains the narrow one.

use airwave_selector::Band;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// FM de-emphasis time constants
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DeemphasisFlags: u8 {
        /// 50 µs (Europe, most of the world)
        const D50 = 1 << 0;
        /// 75 µs (Americas, South Korea)
        const D75 = 1 << 1;
    }
}

bitflags! {
    /// Radio data system variants
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RdsFlags: u8 {
        /// Radio Data System (Europe)
        const RDS = 1 << 0;
        /// Radio Broadcast Data System (North America)
        const RBDS = 1 << 1;
    }
}

/// A tunable AM/FM frequency range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmFmBandRange {
    /// Lowest frequency in kHz
    pub lower_bound: u32,
    /// Highest frequency in kHz
    pub upper_bound: u32,
    /// Manual step size in kHz
    pub spacing: u32,
    /// Seek step size in kHz, 0 if seek uses `spacing`
    pub seek_spacing: u32,
}

impl AmFmBandRange {
    const fn new(lower_bound: u32, upper_bound: u32, spacing: u32, seek_spacing: u32) -> Self {
        Self {
            lower_bound,
            upper_bound,
            spacing,
            seek_spacing,
        }
    }

    /// Returns whether the frequency lies in the range
    pub fn contains(&self, frequency_khz: u32) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&frequency_khz)
    }

    /// Returns whether this range lies entirely within `other`
    pub fn is_within(&self, other: &AmFmBandRange) -> bool {
        other.lower_bound <= self.lower_bound && self.upper_bound <= other.upper_bound
    }

    /// Band this range belongs to
    pub fn band(&self) -> Option<Band> {
        Band::of(self.upper_bound)
    }
}

/// AM/FM capabilities of a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmFmRegionConfig {
    /// Tunable ranges
    pub ranges: Vec<AmFmBandRange>,
    /// Supported FM de-emphasis
    pub fm_deemphasis: DeemphasisFlags,
    /// Supported RDS variants
    pub fm_rds: RdsFlags,
}

impl AmFmRegionConfig {
    /// Returns whether every capability of `self` is also in `other`
    pub fn is_subset_of(&self, other: &AmFmRegionConfig) -> bool {
        other.fm_deemphasis.contains(self.fm_deemphasis)
            && other.fm_rds.contains(self.fm_rds)
            && self
                .ranges
                .iter()
                .all(|r| other.ranges.iter().any(|o| r.is_within(o)))
    }

    /// Range containing the frequency, if any
    pub fn range_for(&self, frequency_khz: u32) -> Option<&AmFmBandRange> {
        self.ranges.iter().find(|r| r.contains(frequency_khz))
    }
}

const NARROW_RANGES: [AmFmBandRange; 4] = [
    AmFmBandRange::new(87_500, 108_000, 100, 100),
    AmFmBandRange::new(153, 282, 3, 9),
    AmFmBandRange::new(531, 1_620, 9, 9),
    AmFmBandRange::new(1_710, 30_000, 1, 5),
];

const FULL_RANGES: [AmFmBandRange; 4] = [
    AmFmBandRange::new(65_000, 108_000, 10, 0),
    AmFmBandRange::new(150, 283, 1, 0),
    AmFmBandRange::new(504, 1_710, 1, 0),
    AmFmBandRange::new(1_710, 30_000, 1, 0),
];

/// AM/FM region configuration
///
/// `full == false` gives the baseline (D50, RDS); `full == true` gives every
/// supported mode.
pub fn am_fm_region_config(full: bool) -> AmFmRegionConfig {
    if full {
        AmFmRegionConfig {
            ranges: FULL_RANGES.to_vec(),
            fm_deemphasis: DeemphasisFlags::D50 | DeemphasisFlags::D75,
            fm_rds: RdsFlags::RDS | RdsFlags::RBDS,
        }
    } else {
        AmFmRegionConfig {
            ranges: NARROW_RANGES.to_vec(),
            fm_deemphasis: DeemphasisFlags::D50,
            fm_rds: RdsFlags::RDS,
        }
    }
}

/// One entry of the DAB channel table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DabTableEntry {
    /// Channel label, e.g. "12B"
    pub label: String,
    /// Center frequency in kHz
    pub frequency_khz: u32,
}

/// Band III channel plan
const DAB_TABLE: [(&str, u32); 41] = [
    ("5A", 174_928),
    ("5B", 176_640),
    ("5C", 178_352),
    ("5D", 180_064),
    ("6A", 181_936),
    ("6B", 183_648),
    ("6C", 185_360),
    ("6D", 187_072),
    ("7A", 188_928),
    ("7B", 190_640),
    ("7C", 192_352),
    ("7D", 194_064),
    ("8A", 195_936),
    ("8B", 197_648),
    ("8C", 199_360),
    ("8D", 201_072),
    ("9A", 202_928),
    ("9B", 204_640),
    ("9C", 206_352),
    ("9D", 208_064),
    ("10A", 209_936),
    ("10N", 210_096),
    ("10B", 211_648),
    ("10C", 213_360),
    ("10D", 215_072),
    ("11A", 216_928),
    ("11N", 217_088),
    ("11B", 218_640),
    ("11C", 220_352),
    ("11D", 222_064),
    ("12A", 223_936),
    ("12N", 224_096),
    ("12B", 225_648),
    ("12C", 227_360),
    ("12D", 229_072),
    ("13A", 230_784),
    ("13B", 232_496),
    ("13C", 234_208),
    ("13D", 235_776),
    ("13E", 237_488),
    ("13F", 239_200),
];

/// DAB channel table, ordered by frequency
pub fn dab_region_config() -> Vec<DabTableEntry> {
    DAB_TABLE
        .iter()
        .map(|&(label, frequency_khz)| DabTableEntry {
            label: label.to_string(),
            frequency_khz,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_config() {
        let config = am_fm_region_config(false);
        assert_eq!(config.fm_deemphasis, DeemphasisFlags::D50);
        assert_eq!(config.fm_rds, RdsFlags::RDS);
        assert!(!config.ranges.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = am_fm_region_config(true);
        assert_eq!(
            config.fm_deemphasis,
            DeemphasisFlags::D50 | DeemphasisFlags::D75
        );
        assert_eq!(config.fm_rds, RdsFlags::RDS | RdsFlags::RBDS);
    }

    #[test]
    fn test_narrow_strictly_within_full() {
        let narrow = am_fm_region_config(false);
        let full = am_fm_region_config(true);
        assert!(narrow.is_subset_of(&full));
        assert!(!full.is_subset_of(&narrow));
    }

    #[test]
    fn test_ranges_map_to_bands() {
        for full in [false, true] {
            for range in am_fm_region_config(full).ranges {
                assert!(range.band().is_some(), "{range:?}");
                assert!(range.spacing > 0);
            }
        }
    }

    #[test]
    fn test_range_for() {
        let config = am_fm_region_config(false);
        assert_eq!(config.range_for(94_900).map(|r| r.spacing), Some(100));
        assert_eq!(config.range_for(560).map(|r| r.spacing), Some(9));
        assert!(config.range_for(50_000).is_none());
    }

    #[test]
    fn test_dab_table() {
        let table = dab_region_config();
        assert!(!table.is_empty());
        assert_eq!(table[0].label, "5A");
        assert!(table
            .windows(2)
            .all(|w| w[0].frequency_khz < w[1].frequency_khz));
    }
}
