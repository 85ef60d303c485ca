//! Application settings

use std::collections::BTreeMap;
use std::path::PathBuf;

use airwave_hal::BroadcastRadioConfig;
use airwave_sim::CatalogConfig;
use serde::{Deserialize, Serialize};

/// Which catalog the tuner serves
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CatalogSource {
    /// Built-in AM/FM and HD catalog
    #[default]
    BuiltinAmFm,
    /// Built-in DAB catalog
    BuiltinDab,
    /// Catalog described in the settings file
    Custom { catalog: CatalogConfig },
}

impl CatalogSource {
    /// The catalog description to build from
    pub fn to_config(&self) -> CatalogConfig {
        match self {
            Self::BuiltinAmFm => CatalogConfig::amfm(),
            Self::BuiltinDab => CatalogConfig::dab(),
            Self::Custom { catalog } => catalog.clone(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    /// Properties the tuner advertises
    #[serde(default)]
    pub tuner: BroadcastRadioConfig,
    /// Catalog to serve
    #[serde(default)]
    pub catalog: CatalogSource,
    /// Image files loaded at start, by image id
    #[serde(default)]
    pub images: BTreeMap<u32, PathBuf>,
}

impl Settings {
    /// Get the XDG config directory for airwave
    /// Uses $XDG_CONFIG_HOME/airwave, falls back to ~/.config/airwave
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("airwave"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("airwave"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::from_json(&s).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings from JSON
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::settings_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine settings path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        Ok(())
    }
}
