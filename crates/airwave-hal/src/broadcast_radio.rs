//! Broadcast radio tuner facade
//!
//! Binds the station catalog, region tables and image store to the
//! operations a client invokes. Queries only read an immutable catalog
//! snapshot. The catalog itself can be swapped as a whole; readers see either
//! the old or the new snapshot, never a mix.

use std::sync::Arc;

use airwave_selector::{make_amfm_selector, ProgramFilter, ProgramSelector, Technology};
use airwave_sim::{LookupError, ProgramInfo, VirtualProgram, VirtualRadio};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{HalError, ResultCode};
use crate::events::TunerEvent;
use crate::image::{ImageStore, INVALID_IMAGE};
use crate::region::{am_fm_region_config, dab_region_config, AmFmRegionConfig, DabTableEntry};
use crate::state::{BroadcastRadioConfig, ConfigFlag, Properties, TunerState};

/// The tuner facade
pub struct BroadcastRadio {
    config: BroadcastRadioConfig,
    catalog: ArcSwap<VirtualRadio>,
    images: Arc<dyn ImageStore>,
    tuner: Mutex<TunerState>,
}

impl BroadcastRadio {
    /// Create a tuner over a catalog with default properties
    pub fn new(radio: VirtualRadio, images: Arc<dyn ImageStore>) -> Result<Self, HalError> {
        Self::with_config(BroadcastRadioConfig::default(), radio, images)
    }

    /// Create a tuner with custom properties
    pub fn with_config(
        config: BroadcastRadioConfig,
        radio: VirtualRadio,
        images: Arc<dyn ImageStore>,
    ) -> Result<Self, HalError> {
        if radio.is_empty() {
            warn!("Refusing to start tuner on empty catalog {}", radio.name());
            return Err(HalError::EmptyCatalog);
        }
        info!("Starting tuner {} on {}", config.product, radio.summary());

        Ok(Self {
            config,
            catalog: ArcSwap::from_pointee(radio),
            images,
            tuner: Mutex::new(TunerState::default()),
        })
    }

    /// Get the tuner configuration
    pub fn config(&self) -> &BroadcastRadioConfig {
        &self.config
    }

    /// Snapshot of the current catalog
    pub fn catalog(&self) -> Arc<VirtualRadio> {
        self.catalog.load_full()
    }

    /// Advertised capabilities
    ///
    /// Identifier types are derived from the catalog, so every type a program
    /// carries is advertised.
    pub fn get_properties(&self) -> Result<Properties, HalError> {
        self.properties_of(&self.catalog.load())
    }

    fn properties_of(&self, catalog: &VirtualRadio) -> Result<Properties, HalError> {
        if catalog.is_empty() {
            return Err(HalError::EmptyCatalog);
        }
        Ok(Properties {
            maker: self.config.maker.clone(),
            product: self.config.product.clone(),
            version: self.config.version.clone(),
            serial: self.config.serial.clone(),
            supported_identifier_types: catalog.used_identifier_types().into_iter().collect(),
        })
    }

    /// AM/FM region configuration, baseline or full
    pub fn get_am_fm_region_config(&self, full: bool) -> AmFmRegionConfig {
        am_fm_region_config(full)
    }

    /// DAB channel table
    pub fn get_dab_region_config(&self) -> Vec<DabTableEntry> {
        dab_region_config()
    }

    /// Image bytes by id; [`INVALID_IMAGE`] yields no bytes
    pub fn get_image(&self, id: u32) -> Result<Vec<u8>, HalError> {
        if id == INVALID_IMAGE {
            return Ok(Vec::new());
        }
        self.images
            .image(id)
            .ok_or_else(|| HalError::NotFound(format!("image {id}")))
    }

    /// Every program, in registration order
    pub fn get_program_list(&self) -> Vec<VirtualProgram> {
        self.catalog.load().program_list().to_vec()
    }

    /// Programs passing the filter, in registration order
    pub fn program_list(&self, filter: &ProgramFilter) -> Vec<VirtualProgram> {
        self.catalog
            .load()
            .program_list_filtered(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The single program matching the selector
    pub fn lookup(&self, selector: &ProgramSelector) -> Result<VirtualProgram, HalError> {
        Ok(self.catalog.load().get_program_at(selector)?.clone())
    }

    /// Tune to the program identified by the selector
    ///
    /// An AM/FM frequency with nothing registered on it still tunes, to an
    /// unnamed program.
    pub fn tune(&self, selector: &ProgramSelector) -> Result<ProgramInfo, HalError> {
        let mut tuner = self.tuner.lock();
        match self.resolve_tune(&self.catalog.load(), selector) {
            Ok(info) => {
                info!("Tuned to {}", info.selector);
                tuner.set_current(info.clone());
                Ok(info)
            }
            Err(err) => {
                warn!("Tune to {} failed: {}", selector, err);
                tuner.events.push(TunerEvent::TuneFailed {
                    result: err.result(),
                    selector: Some(selector.clone()),
                });
                Err(err)
            }
        }
    }

    fn resolve_tune(
        &self,
        catalog: &VirtualRadio,
        selector: &ProgramSelector,
    ) -> Result<ProgramInfo, HalError> {
        let properties = self.properties_of(catalog)?;
        let primary_type = selector.primary_id().id_type;
        if !properties.can_query(primary_type) {
            return Err(HalError::NotSupported(primary_type));
        }

        match catalog.get_program_at(selector) {
            Ok(program) => Ok(program.to_program_info()),
            Err(LookupError::NotFound(_))
                if selector.technology() == Technology::AmFm
                    && selector.secondary_ids().is_empty() =>
            {
                debug!("Nothing registered on {}, tuning to empty carrier", selector);
                Ok(ProgramInfo::unnamed(selector.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Move to the next or previous program in frequency order, wrapping
    ///
    /// With `skip_sub_channel`, only the main program of each HD station is
    /// considered.
    pub fn seek(
        &self,
        direction_up: bool,
        skip_sub_channel: bool,
    ) -> Result<ProgramInfo, HalError> {
        let mut tuner = self.tuner.lock();
        let catalog = self.catalog.load();

        let mut stations: Vec<&VirtualProgram> = catalog
            .program_list()
            .iter()
            .filter(|p| p.selector.frequency_khz().is_some())
            .filter(|p| !skip_sub_channel || p.selector.hd_sub_channel().unwrap_or(0) == 0)
            .collect();
        stations.sort_by_key(|p| seek_key(&p.selector));

        let current = tuner.current.as_ref().map(|info| seek_key(&info.selector));
        let next = match (current, direction_up) {
            (None, true) => stations.first(),
            (None, false) => stations.last(),
            (Some(cur), true) => stations
                .iter()
                .find(|p| seek_key(&p.selector) > cur)
                .or_else(|| stations.first()),
            (Some(cur), false) => stations
                .iter()
                .rev()
                .find(|p| seek_key(&p.selector) < cur)
                .or_else(|| stations.last()),
        };

        let Some(program) = next else {
            tuner.events.push(TunerEvent::TuneFailed {
                result: ResultCode::InvalidState,
                selector: None,
            });
            return Err(HalError::InvalidState("no station to seek to".to_string()));
        };

        let info = program.to_program_info();
        info!(
            "Seek {} landed on {}",
            if direction_up { "up" } else { "down" },
            info.selector
        );
        tuner.set_current(info.clone());
        Ok(info)
    }

    /// Move one channel spacing within the current AM/FM band, wrapping at the edges
    pub fn step(&self, direction_up: bool) -> Result<ProgramInfo, HalError> {
        let mut tuner = self.tuner.lock();
        let catalog = self.catalog.load();

        let Some(current) = tuner.current.as_ref() else {
            return Err(HalError::InvalidState("step requires a tuned program".to_string()));
        };
        if current.selector.technology() != Technology::AmFm {
            return Err(HalError::NotSupported(current.selector.primary_id().id_type));
        }
        let Some(frequency) = current.selector.frequency_khz() else {
            return Err(HalError::InvalidState("tuned program has no frequency".to_string()));
        };

        let narrow = am_fm_region_config(false);
        let full = am_fm_region_config(true);
        let range = narrow
            .range_for(frequency)
            .or_else(|| full.range_for(frequency))
            .copied()
            .ok_or_else(|| HalError::InvalidState(format!("{frequency} kHz outside every band")))?;

        let target = if direction_up {
            let next = frequency + range.spacing;
            if next > range.upper_bound {
                range.lower_bound
            } else {
                next
            }
        } else {
            match frequency.checked_sub(range.spacing) {
                Some(prev) if prev >= range.lower_bound => prev,
                _ => range.upper_bound,
            }
        };

        let selector = make_amfm_selector(target)?;
        let info = match catalog.lookup_all(&selector).as_slice() {
            [program] => program.to_program_info(),
            _ => ProgramInfo::unnamed(selector),
        };
        debug!("Step {} kHz -> {} kHz", frequency, target);
        tuner.set_current(info.clone());
        Ok(info)
    }

    /// Cancel a pending tune, seek or step
    ///
    /// The simulated tuner completes every operation synchronously, so there is
    /// never anything to cancel.
    pub fn cancel(&self) {
        debug!("Cancel requested, nothing pending");
    }

    /// Program the tuner is on
    pub fn current_program(&self) -> Option<ProgramInfo> {
        self.tuner.lock().current.clone()
    }

    /// Read a configuration flag; unset flags read false
    pub fn get_config_flag(&self, flag: ConfigFlag) -> bool {
        self.tuner.lock().flags.get(&flag).copied().unwrap_or(false)
    }

    /// Set a configuration flag
    pub fn set_config_flag(&self, flag: ConfigFlag, value: bool) {
        let mut tuner = self.tuner.lock();
        let previous = tuner.flags.insert(flag, value).unwrap_or(false);
        if previous != value {
            debug!("Config flag {:?} -> {}", flag, value);
            tuner
                .events
                .push(TunerEvent::ConfigFlagUpdated { flag, value });
        }
    }

    /// Replace the whole catalog atomically
    ///
    /// Serialized with tune, seek and step, so none of them completes against
    /// a catalog that was replaced while it ran.
    pub fn replace_catalog(&self, radio: VirtualRadio) -> Result<(), HalError> {
        if radio.is_empty() {
            warn!("Rejecting empty replacement catalog {}", radio.name());
            return Err(HalError::EmptyCatalog);
        }
        let event = TunerEvent::ProgramListUpdated {
            name: radio.name().to_string(),
            programs: radio.len(),
        };
        info!("Replacing catalog with {}", radio.summary());
        let mut tuner = self.tuner.lock();
        self.catalog.store(Arc::new(radio));
        tuner.events.push(event);
        Ok(())
    }

    /// Take all buffered events, oldest first
    pub fn drain_events(&self) -> Vec<TunerEvent> {
        std::mem::take(&mut self.tuner.lock().events)
    }
}

/// Ordering used by seek: carrier frequency, then subchannel, then primary value
fn seek_key(selector: &ProgramSelector) -> (u32, u32, u64) {
    (
        selector.frequency_khz().unwrap_or(0),
        selector.hd_sub_channel().unwrap_or(0),
        selector.primary_id().value,
    )
}
