//! Broadcast Radio Simulation Library
//!
//! This crate provides a simulated station catalog for exercising tuner
//! logic without RF hardware. It includes:
//!
//! - **VirtualRadio**: an immutable catalog of programs keyed by selector
//! - **CatalogConfig**: a serializable description of a catalog
//! - **ProgramInfo**: what a tuner reports while tuned to a program
//!
//! # Example
//!
//! ```rust
//! use airwave_selector::make_amfm_selector;
//! use airwave_sim::{CatalogConfig, LookupError, VirtualRadio};
//!
//! let radio = VirtualRadio::from_config(CatalogConfig::amfm()).unwrap();
//!
//! let program = radio.get_program_at(&make_amfm_selector(96_500).unwrap()).unwrap();
//! assert_eq!(program.program_name, "Soft 96.5");
//!
//! // Two HD subchannels share 103.9 MHz
//! let query = make_amfm_selector(103_900).unwrap();
//! assert!(matches!(radio.get_program_at(&query), Err(LookupError::Ambiguous { .. })));
//! ```

pub mod catalog;
pub mod error;
pub mod program;
pub mod radio;

pub use catalog::{CatalogConfig, ProgramConfig, StationAddress};
pub use error::{LookupError, RegistryError};
pub use program::{Metadata, ProgramInfo, VirtualProgram};
pub use radio::VirtualRadio;
