//! Fehler bei der Verletzung von Invarianten des Straßenmodells.

use road_geometry::GeometryError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Ungueltige Geometrie: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Lane-Section bei s={s} beginnt nicht nach der vorherigen (s={previous})")]
    NonIncreasingLaneSection { previous: f64, s: f64 },
    #[error("Lane-ID {0} muss innerhalb der Lane-Section eindeutig sein")]
    DuplicateLaneId(i32),
    #[error("Lane-IDs der Lane-Section sind nicht lueckenlos: {0:?}")]
    NonContiguousLaneIds(Vec<i32>),
    #[error("Lane {lane_id} hat bereits einen {kind}")]
    DuplicateLaneLink { lane_id: i32, kind: &'static str },
    #[error("Lane 0 (Mitte) darf keine Breite haben")]
    CenterLaneGeometry,
    #[error("Lane {0} existiert nicht")]
    UnknownLane(i32),
    #[error("Road-Link {0} ist bereits gesetzt")]
    DuplicateRoadLink(&'static str),
    #[error("Ungueltiger Wert '{field}': {value}")]
    InvalidValue { field: &'static str, value: f64 },
}
