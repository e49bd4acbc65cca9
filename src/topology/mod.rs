//! Lane-Topologie über einer importierten [`Scenery`](crate::core::Scenery).
//!
//! [`LaneGraph`] verbindet die Lanes aller Sections. Darauf bauen die
//! Routen-Abfragen ([`route`]) und die Junction-Abfragen ([`junctions`]) auf.
//! Die Scenery wird dabei nur gelesen.

mod error;
pub mod graph;
pub mod junctions;
pub mod route;

pub use error::TopologyError;
pub use graph::{LaneEdge, LaneGraph, LaneNode};
pub use junctions::{
    junction_intersections, junction_priorities, outgoing_connections, JunctionIntersection,
};
pub use route::{
    distance_to_lane_end, relative_id, relative_lanes, traffic_signs_in_range, RelativeLane,
    RelativeLaneSection, RouteElement, TrafficSignInRange,
};
