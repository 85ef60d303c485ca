//! Tuner properties and session state

use std::collections::{BTreeSet, HashMap, HashSet};

use airwave_selector::{
    is_identifier_type_queryable, is_identifier_type_supported, IdentifierType,
};
use airwave_sim::ProgramInfo;
use serde::{Deserialize, Serialize};

use crate::events::TunerEvent;

/// Static description of the tuner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRadioConfig {
    /// Manufacturer name
    pub maker: String,
    /// Product name
    pub product: String,
    /// Product version
    pub version: String,
    /// Serial number
    pub serial: String,
}

impl Default for BroadcastRadioConfig {
    fn default() -> Self {
        Self {
            maker: "Airwave".to_string(),
            product: "Virtual tuner".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            serial: "0000".to_string(),
        }
    }
}

/// Capabilities advertised to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    pub maker: String,
    pub product: String,
    pub version: String,
    pub serial: String,
    /// Every identifier type the tuner understands; never empty
    pub supported_identifier_types: HashSet<IdentifierType>,
}

impl Properties {
    /// Returns whether the identifier type is advertised
    pub fn supports(&self, id_type: IdentifierType) -> bool {
        is_identifier_type_supported(&self.supported_identifier_types, id_type)
    }

    /// Returns whether a selector with this primary type can match a catalog program
    pub fn can_query(&self, id_type: IdentifierType) -> bool {
        is_identifier_type_queryable(&self.supported_identifier_types, id_type)
    }

    /// Advertised types in a stable order
    pub fn sorted_identifier_types(&self) -> Vec<IdentifierType> {
        self.supported_identifier_types
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Tuner configuration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigFlag {
    /// Force mono audio even for stereo broadcasts
    ForceMono,
    /// Play only the analog signal of hybrid broadcasts
    ForceAnalog,
    /// Play only the digital signal of hybrid broadcasts
    ForceDigital,
    /// Follow RDS alternative frequencies
    RdsAf,
    /// Follow RDS regional variants
    RdsReg,
    /// Follow DAB to DAB hard links
    DabDabLinking,
    /// Follow DAB to FM hard links
    DabFmLinking,
    /// Follow DAB to DAB soft links
    DabDabSoftLinking,
    /// Follow DAB to FM soft links
    DabFmSoftLinking,
}

/// Mutable part of the tuner, guarded by the facade
#[derive(Debug, Default)]
pub(crate) struct TunerState {
    /// Program the tuner is on
    pub current: Option<ProgramInfo>,
    /// Explicitly set flags; absent flags read false
    pub flags: HashMap<ConfigFlag, bool>,
    /// Events not yet drained
    pub events: Vec<TunerEvent>,
}

impl TunerState {
    pub fn set_current(&mut self, info: ProgramInfo) {
        self.current = Some(info.clone());
        self.events.push(TunerEvent::CurrentProgramInfoChanged(info));
    }
}
