//! Catalog configuration
//!
//! Describes a station catalog in broadcast terms (frequencies, station ids)
//! so it can be kept in a settings file. Entries are validated through the
//! selector factories when the catalog is built.

use airwave_selector::{
    make_amfm_selector, make_dab_selector, make_hd_selector, Identifier, ProgramSelector,
    SelectorError,
};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::program::VirtualProgram;

/// How a configured station is addressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StationAddress {
    /// Analog AM/FM station
    AmFm {
        frequency_khz: u32,
        /// RDS program identification, if broadcast
        #[serde(default)]
        rds_pi: Option<u16>,
        /// Station id of the HD simulcast on this carrier, if any
        #[serde(default)]
        hd_station_id: Option<u64>,
    },
    /// HD Radio subchannel
    Hd {
        station_id: u64,
        sub_channel: u32,
        frequency_khz: u32,
    },
    /// DAB service
    Dab {
        sid_ext: u64,
        ensemble: u64,
        frequency_khz: u32,
    },
}

impl StationAddress {
    /// Build the selector for this address
    pub fn to_selector(&self) -> Result<ProgramSelector, SelectorError> {
        match *self {
            Self::AmFm {
                frequency_khz,
                rds_pi,
                hd_station_id,
            } => {
                let mut sel = make_amfm_selector(frequency_khz)?;
                if let Some(pi) = rds_pi {
                    sel = sel.with_secondary(Identifier::rds_pi(pi))?;
                }
                if let Some(station_id) = hd_station_id {
                    sel = sel.with_secondary(Identifier::hd_station_id_ext(
                        station_id,
                        0,
                        frequency_khz,
                    )?)?;
                }
                Ok(sel)
            }
            Self::Hd {
                station_id,
                sub_channel,
                frequency_khz,
            } => make_hd_selector(station_id, sub_channel, frequency_khz),
            Self::Dab {
                sid_ext,
                ensemble,
                frequency_khz,
            } => make_dab_selector(sid_ext, ensemble, frequency_khz),
        }
    }
}

/// One configured program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Address of the station
    #[serde(flatten)]
    pub address: StationAddress,
    /// Station / program service name
    pub program_name: String,
    /// Artist on air
    #[serde(default)]
    pub artist_name: String,
    /// Title on air
    #[serde(default)]
    pub title_name: String,
    /// Station logo image id
    #[serde(default)]
    pub station_icon: Option<u32>,
    /// Album art image id
    #[serde(default)]
    pub album_art: Option<u32>,
}

impl ProgramConfig {
    fn new(address: StationAddress, program: &str, artist: &str, title: &str) -> Self {
        Self {
            address,
            program_name: program.to_string(),
            artist_name: artist.to_string(),
            title_name: title.to_string(),
            station_icon: None,
            album_art: None,
        }
    }

    /// Validate and convert into a catalog program
    pub fn into_program(self) -> Result<VirtualProgram, RegistryError> {
        let selector = self
            .address
            .to_selector()
            .map_err(|source| RegistryError::InvalidEntry {
                program: self.program_name.clone(),
                source,
            })?;
        Ok(VirtualProgram {
            selector,
            program_name: self.program_name,
            artist_name: self.artist_name,
            title_name: self.title_name,
            station_icon: self.station_icon,
            album_art: self.album_art,
        })
    }
}

/// Configuration for building a virtual radio catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Display name
    pub name: String,
    /// Programs in registration order
    pub programs: Vec<ProgramConfig>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::amfm()
    }
}

fn amfm(frequency_khz: u32) -> StationAddress {
    StationAddress::AmFm {
        frequency_khz,
        rds_pi: None,
        hd_station_id: None,
    }
}

fn hd(station_id: u64, sub_channel: u32, frequency_khz: u32) -> StationAddress {
    StationAddress::Hd {
        station_id,
        sub_channel,
        frequency_khz,
    }
}

impl CatalogConfig {
    /// Built-in AM/FM catalog with analog and HD Radio stations
    pub fn amfm() -> Self {
        let mut kbay = ProgramConfig::new(
            StationAddress::AmFm {
                frequency_khz: 94_900,
                rds_pi: Some(0x54A8),
                hd_station_id: None,
            },
            "Bay 94.9",
            "The Lumineers",
            "Ophelia",
        );
        kbay.station_icon = Some(1);

        let mut hd1 = ProgramConfig::new(
            hd(0xA000_0001, 0, 103_900),
            "Coast HD1",
            "Fleetwood Mac",
            "Dreams",
        );
        hd1.station_icon = Some(2);
        hd1.album_art = Some(3);

        Self {
            name: "AM/FM radio".to_string(),
            programs: vec![
                kbay,
                ProgramConfig::new(amfm(96_500), "Soft 96.5", "Norah Jones", "Come Away With Me"),
                ProgramConfig::new(amfm(97_300), "Rock 97.3", "Foo Fighters", "Everlong"),
                ProgramConfig::new(amfm(99_700), "Hits 99.7", "Dua Lipa", "Levitating"),
                ProgramConfig::new(amfm(101_300), "Kiss 101.3", "Daft Punk", "Get Lucky"),
                ProgramConfig::new(amfm(106_100), "Jam 106.1", "Outkast", "Hey Ya!"),
                ProgramConfig::new(amfm(700), "News 700", "Newsroom", "Top of the Hour"),
                ProgramConfig::new(amfm(1_700), "Talk 1700", "Host", "Open Lines"),
                hd1,
                ProgramConfig::new(
                    hd(0xA000_0001, 1, 103_900),
                    "Coast HD2",
                    "Various",
                    "Deep Cuts",
                ),
                ProgramConfig::new(hd(0xA000_0002, 0, 105_300), "Metro HD1", "Beyonce", "Halo"),
                ProgramConfig::new(
                    hd(0xA000_0002, 1, 105_300),
                    "Metro HD2",
                    "Miles Davis",
                    "So What",
                ),
                ProgramConfig::new(
                    hd(0xB000_0001, 0, 1_170),
                    "Sports 1170 HD",
                    "Broadcast",
                    "Pregame",
                ),
            ],
        }
    }

    /// Built-in DAB catalog
    pub fn dab() -> Self {
        let dab = |sid_ext, ensemble, frequency_khz| StationAddress::Dab {
            sid_ext,
            ensemble,
            frequency_khz,
        };
        Self {
            name: "DAB radio".to_string(),
            programs: vec![
                ProgramConfig::new(
                    dab(0xE1_C221, 0xCE15, 225_648),
                    "Capital One",
                    "Adele",
                    "Hello",
                ),
                ProgramConfig::new(
                    dab(0xE1_C222, 0xCE15, 225_648),
                    "Capital Two",
                    "Coldplay",
                    "Yellow",
                ),
                ProgramConfig::new(
                    dab(0xE1_C301, 0xC1CE, 222_064),
                    "Classic FM",
                    "Holst",
                    "Jupiter",
                ),
                ProgramConfig::new(
                    dab(0xE1_C302, 0xC1CE, 222_064),
                    "Jazz Line",
                    "Nina Simone",
                    "Feeling Good",
                ),
            ],
        }
    }
}
