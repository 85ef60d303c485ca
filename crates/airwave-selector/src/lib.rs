//! Program Selector Library
//!
//! This crate provides the identity model for broadcast radio programs:
//!
//! - **Identifier**: a typed 64-bit addressing atom (AM/FM frequency, HD Radio
//!   station id, DAB service id, ...)
//! - **ProgramSelector**: one primary identifier plus secondary identifiers
//! - **Matching rules**: decide whether two selectors denote the same program
//!
//! # Architecture
//!
//! The same program can be addressed several ways. An HD Radio subchannel is
//! primarily its extended station id, but a client scanning the analog band
//! only knows the carrier frequency. Selectors therefore carry secondary
//! identifiers, and identity is decided by overlap rather than equality:
//!
//! - `AMFM_FREQUENCY_KHZ=98500` matches both HD subchannels on 98.5 MHz
//! - `HD_STATION_ID_EXT` for subchannel 1 matches only that subchannel
//!
//! # Example
//!
//! ```rust
//! use airwave_selector::{make_amfm_selector, make_hd_selector, selectors_match};
//!
//! let hd1 = make_hd_selector(0xA000_0001, 0, 98_500).unwrap();
//! let hd2 = make_hd_selector(0xA000_0001, 1, 98_500).unwrap();
//! let analog = make_amfm_selector(98_500).unwrap();
//!
//! assert!(selectors_match(&analog, &hd1));
//! assert!(selectors_match(&analog, &hd2));
//! assert!(!selectors_match(&hd1, &hd2));
//! ```

pub mod error;
pub mod identifier;
pub mod matching;
pub mod selector;

pub use error::SelectorError;
pub use identifier::{Band, Identifier, IdentifierType, MAX_HD_SUB_CHANNEL};
pub use matching::{
    identifiers_overlap, is_identifier_type_queryable, is_identifier_type_supported, match_key,
    match_key_type, matching_indices, selectors_match, ProgramFilter,
};
pub use selector::{
    make_amfm_selector, make_dab_selector, make_hd_selector, ProgramSelector, Technology,
};
