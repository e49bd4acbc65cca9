//! OpenDRIVE-Szenerie-Importer mit Lane-Topologie.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod core;
pub mod shared;
pub mod topology;
pub mod xml;

pub use core::{
    Connection, Junction, Lane, LaneSection, LaneType, ModelError, Road, RoadObjectSpecification,
    RoadSignalSpecification, Scenery,
};
pub use shared::{ImportOptions, SimulatorLimits};
pub use topology::{LaneGraph, RelativeLaneSection, RouteElement, TopologyError};
pub use xml::{parse_scenery, ImportReport, ParseError, SceneryImporter, ScenerySummary};
