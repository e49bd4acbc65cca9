//! Geteilte Typen für modulübergreifende Verträge.
//!
//! Enthält die Import-Optionen, die von `core` (Simulator-Grenzen)
//! und `xml` (Rundung, Snapping) gemeinsam genutzt werden.

pub mod options;

pub use options::{ImportOptions, SimulatorLimits};
pub use options::{
    HEADING_DECIMALS, MAX_ELEMENT_DEPTH, MAX_REPEAT_INSTANCES, POSITION_DECIMALS,
};
