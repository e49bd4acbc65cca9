//! `road_geometry`: Geometrische Grundelemente für OpenDRIVE-Straßen.
//!
//! Enthält:
//! - kubische Polynome für Höhenprofil, Lane-Offset, Breiten und Ränder
//! - Segmente der Referenzlinie (line, arc, spiral, poly3, paramPoly3)
//! - Rundung der Header-Werte auf feste Nachkommastellen
//!
//! # Beispiel
//! ```
//! use road_geometry::RoadGeometry;
//!
//! let arc = RoadGeometry::arc(0.0, 0.0, 0.0, 0.0, 10.0, 0.01)?;
//! let pos = arc.coord(5.0, 0.0);
//! assert!(pos.x > 4.9 && pos.x < 5.0);
//! # Ok::<(), road_geometry::GeometryError>(())
//! ```

pub mod polynomial;
pub mod segment;
mod spiral;

pub use polynomial::{evaluate_records, record_at, CubicPolynomial, PolynomialRecord};
pub use segment::{
    snap_curvature, GeometryKind, ParamPoly3Parameters, ParamRange, RoadGeometry,
    SPIRAL_ARC_TOLERANCE, SPIRAL_CURVATURE_EPSILON,
};

/// Strukturell ungültige Segmentdaten.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Wert '{field}' ist keine endliche Zahl: {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("Negative Segmentlaenge: {0}")]
    NegativeLength(f64),
    #[error("Negative Startposition s: {0}")]
    NegativeStart(f64),
    #[error("Segment beginnt bei s={s}, vorheriges Segment bei s={previous}")]
    DecreasingStart { previous: f64, s: f64 },
}

/// Rundet `value` auf `decimals` Nachkommastellen.
///
/// Die Header-Werte der Referenzlinie werden damit normalisiert
/// (s, x, y, length auf 3, hdg auf 6 Stellen).
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
