//! Core-Domänentypen: Straßen, Lanes, Junctions und die Scenery.

pub mod error;
pub mod junction;
pub mod lane;
pub mod object;
pub mod road;
pub mod scenery;
pub mod signal;
pub mod types;

pub use error::ModelError;
pub use junction::{Connection, Junction, Priority};
pub use lane::{Lane, LaneSection, RoadMark};
pub use object::{
    interpolate_linear, Interval, ObjectRepeat, RoadElementValidity, RoadObjectSpecification,
};
pub use road::{Road, RoadLink, RoadTypeSpecification, NO_JUNCTION};
pub use scenery::Scenery;
pub use signal::RoadSignalSpecification;
pub use types::{
    ContactPoint, LaneChange, LaneSide, LaneType, LinkKind, RoadElementOrientation,
    RoadLinkElementType, RoadMarkColor, RoadMarkType, RoadMarkWeight, RoadObjectType,
    RoadSignalUnit, RoadTypeInformation,
};
