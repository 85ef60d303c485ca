//! Broadcast Radio Tuner Facade
//!
//! This crate provides the operations a broadcast radio client invokes on a
//! tuner, on top of the simulated catalog from `airwave-sim`.
//!
//! # Architecture
//!
//! The [`BroadcastRadio`] facade composes:
//!
//! - **Catalog**: an immutable [`airwave_sim::VirtualRadio`] snapshot, replaceable as a whole
//! - **Region tables**: AM/FM capabilities (narrow or full) and the DAB channel table
//! - **Image store**: station logos and album art, owned by the caller
//! - **Tuner session**: current program, configuration flags and buffered events
//!
//! Queries (`get_properties`, `lookup`, region tables, images) only read and
//! can be called from any number of threads. Tuning operations serialize on
//! the session lock.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use airwave_hal::{BroadcastRadio, MemoryImageStore, INVALID_IMAGE};
//! use airwave_selector::{make_amfm_selector, IdentifierType};
//! use airwave_sim::VirtualRadio;
//!
//! let radio = BroadcastRadio::new(
//!     VirtualRadio::default_amfm().unwrap(),
//!     Arc::new(MemoryImageStore::new()),
//! )
//! .unwrap();
//!
//! let props = radio.get_properties().unwrap();
//! assert!(props.supports(IdentifierType::AmFmFrequencyKhz));
//! assert!(radio.get_image(INVALID_IMAGE).unwrap().is_empty());
//!
//! let info = radio.tune(&make_amfm_selector(97_300).unwrap()).unwrap();
//! assert_eq!(info.program_name(), Some("Rock 97.3"));
//! ```

pub mod broadcast_radio;
pub mod error;
pub mod events;
pub mod image;
pub mod region;
pub mod state;

pub use broadcast_radio::BroadcastRadio;
pub use error::{HalError, ResultCode};
pub use events::TunerEvent;
pub use image::{ImageStore, MemoryImageStore, INVALID_IMAGE};
pub use region::{
    am_fm_region_config, dab_region_config, AmFmBandRange, AmFmRegionConfig, DabTableEntry,
    DeemphasisFlags, RdsFlags,
};
pub use state::{BroadcastRadioConfig, ConfigFlag, Properties};
