//! Tuner events
//!
//! State changes are buffered in order and handed to the caller through
//! [`crate::BroadcastRadio::drain_events`]; delivering them to remote
//! clients is the transport layer's job.

use airwave_selector::ProgramSelector;
use airwave_sim::ProgramInfo;

use crate::error::ResultCode;
use crate::state::ConfigFlag;

/// Something the tuner reports without being asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunerEvent {
    /// The tuner moved to a different program
    CurrentProgramInfoChanged(ProgramInfo),

    /// A tune, seek or step did not complete
    TuneFailed {
        /// Why it failed
        result: ResultCode,
        /// Selector that was requested, if any
        selector: Option<ProgramSelector>,
    },

    /// A configuration flag changed value
    ConfigFlagUpdated {
        /// The flag
        flag: ConfigFlag,
        /// Its new value
        value: bool,
    },

    /// The catalog was replaced
    ProgramListUpdated {
        /// Name of the new catalog
        name: String,
        /// Number of programs in it
        programs: usize,
    },
}
