//! Fehler der Topologie-Abfragen.

/// Ungültige Abfrage oder inkonsistente Verknüpfungsdaten.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("Unbekannte Straße {0}")]
    UnknownRoad(String),
    #[error("Straße {road_id}: unbekannte Lane {lane_id} bei s={s}")]
    UnknownLane { road_id: String, lane_id: i32, s: f64 },
    #[error("Unbekannte Junction {0}")]
    UnknownJunction(String),
    #[error("Route ist leer")]
    EmptyRoute,
    #[error("Straße {road_id}: Position s={s} liegt außerhalb der Straße")]
    PositionOutsideRoad { road_id: String, s: f64 },
    #[error("Route {from} -> {to}: Fahrtrichtung passt nicht zu den Verknüpfungen")]
    InconsistentDirection { from: String, to: String },
    #[error("Route {from} -> {to}: Straßen sind nicht verbunden")]
    RouteNotConnected { from: String, to: String },
    #[error("Straße {road_id}, Section {section}: Lane {lane_id} verweist auf fehlende Lane {target}")]
    BrokenLaneChain {
        road_id: String,
        section: usize,
        lane_id: i32,
        target: i32,
    },
    #[error("Schrittweite muss positiv sein: {0}")]
    InvalidStep(f64),
}
