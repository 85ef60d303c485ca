//! Simulated programs and the program info derived from them

use airwave_selector::{Identifier, IdentifierType, ProgramSelector, Technology};
use serde::{Deserialize, Serialize};

/// A program in the simulated catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualProgram {
    /// Identity of the program
    pub selector: ProgramSelector,
    /// Station / program service name
    pub program_name: String,
    /// Artist of the song currently on air
    pub artist_name: String,
    /// Title of the song currently on air
    pub title_name: String,
    /// Image id of the station logo
    #[serde(default)]
    pub station_icon: Option<u32>,
    /// Image id of the current album art
    #[serde(default)]
    pub album_art: Option<u32>,
}

impl VirtualProgram {
    /// Create a program without images
    pub fn new(
        selector: ProgramSelector,
        program_name: impl Into<String>,
        artist_name: impl Into<String>,
        title_name: impl Into<String>,
    ) -> Self {
        Self {
            selector,
            program_name: program_name.into(),
            artist_name: artist_name.into(),
            title_name: title_name.into(),
            station_icon: None,
            album_art: None,
        }
    }

    /// Attach a station logo
    pub fn with_station_icon(mut self, image_id: u32) -> Self {
        self.station_icon = Some(image_id);
        self
    }

    /// Attach album art
    pub fn with_album_art(mut self, image_id: u32) -> Self {
        self.album_art = Some(image_id);
        self
    }

    /// Build the program info a tuner reports while tuned to this program
    pub fn to_program_info(&self) -> ProgramInfo {
        let primary = *self.selector.primary_id();
        let physically_tuned_to = match self.selector.technology() {
            Technology::Hd => self
                .selector
                .frequency_khz()
                .map(|khz| Identifier::new(IdentifierType::AmFmFrequencyKhz, u64::from(khz)))
                .unwrap_or(primary),
            Technology::Dab => self
                .selector
                .secondary_ids()
                .iter()
                .find(|id| id.id_type == IdentifierType::DabFrequencyKhz)
                .copied()
                .unwrap_or(primary),
            _ => primary,
        };

        let mut metadata = vec![
            Metadata::RdsPs(self.program_name.clone()),
            Metadata::SongTitle(self.title_name.clone()),
            Metadata::SongArtist(self.artist_name.clone()),
        ];
        if let Some(id) = self.station_icon {
            metadata.push(Metadata::StationIcon(id));
        }
        if let Some(id) = self.album_art {
            metadata.push(Metadata::AlbumArt(id));
        }

        ProgramInfo {
            selector: self.selector.clone(),
            logically_tuned_to: primary,
            physically_tuned_to,
            metadata,
        }
    }
}

/// Metadata entry attached to a program info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metadata {
    /// RDS program service name
    RdsPs(String),
    /// Song title
    SongTitle(String),
    /// Song artist
    SongArtist(String),
    /// Station logo image id
    StationIcon(u32),
    /// Album art image id
    AlbumArt(u32),
}

/// What the tuner reports about the program it is tuned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    /// Selector of the program
    pub selector: ProgramSelector,
    /// Identifier the tuner is logically tuned to
    pub logically_tuned_to: Identifier,
    /// Physical carrier the tuner is receiving
    pub physically_tuned_to: Identifier,
    /// Display metadata
    pub metadata: Vec<Metadata>,
}

impl ProgramInfo {
    /// Program info for a frequency with nothing registered on it
    pub fn unnamed(selector: ProgramSelector) -> Self {
        let primary = *selector.primary_id();
        Self {
            selector,
            logically_tuned_to: primary,
            physically_tuned_to: primary,
            metadata: Vec::new(),
        }
    }

    /// Program service name, if present
    pub fn program_name(&self) -> Option<&str> {
        self.metadata.iter().find_map(|m| match m {
            Metadata::RdsPs(name) => Some(name.as_str()),
            _ => None,
        })
    }
}
