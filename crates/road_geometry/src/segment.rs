//! Segmente der Referenzlinie (planView) einer Straße.
//!
//! Jedes Segment beginnt an `s` mit Startpunkt `(x, y)` und Kurs `hdg` und
//! wird über den lokalen Offset `ds ∈ [0, length]` ausgewertet.

use glam::DVec2;

use crate::polynomial::CubicPolynomial;
use crate::spiral;
use crate::GeometryError;

/// Krümmungen mit kleinerem Betrag werden bei Spiralen auf 0 gesetzt.
pub const SPIRAL_CURVATURE_EPSILON: f64 = 1e-7;
/// Unterschied der Spiral-Krümmungen, unter dem die Spirale als Bogen gilt.
pub const SPIRAL_ARC_TOLERANCE: f64 = 1e-6;
/// Krümmung, unter der ein Bogen als Gerade ausgewertet wird.
const ARC_LINE_TOLERANCE: f64 = 1e-12;
/// Iterationen der Bogenlängen-Inversion bei Poly3.
const POLY3_NEWTON_ITERATIONS: usize = 20;
/// Simpson-Intervalle der Poly3-Bogenlänge.
const POLY3_SIMPSON_INTERVALS: usize = 32;

/// Bezugsgröße des Parameters `p` einer paramPoly3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamRange {
    /// `p ∈ [0, 1]`
    #[default]
    Normalized,
    /// `p ∈ [0, length]`
    ArcLength,
}

impl ParamRange {
    /// Übersetzt den XML-Wert (`normalized` / `arcLength`).
    pub fn from_xml_str(value: &str) -> Option<Self> {
        match value {
            "normalized" => Some(Self::Normalized),
            "arcLength" => Some(Self::ArcLength),
            _ => None,
        }
    }
}

/// Koeffizienten einer paramPoly3: `u(p)` und `v(p)` unabhängig kubisch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamPoly3Parameters {
    pub u: CubicPolynomial,
    pub v: CubicPolynomial,
    pub range: ParamRange,
}

/// Typ-spezifische Parameter eines Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryKind {
    Line,
    Arc { curvature: f64 },
    Spiral { curv_start: f64, curv_end: f64 },
    Poly3(CubicPolynomial),
    ParamPoly3(ParamPoly3Parameters),
}

impl GeometryKind {
    /// Kurzname wie im XML-Tag
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Arc { .. } => "arc",
            Self::Spiral { .. } => "spiral",
            Self::Poly3(_) => "poly3",
            Self::ParamPoly3(_) => "paramPoly3",
        }
    }
}

/// Ein Segment der Referenzlinie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadGeometry {
    pub s: f64,
    pub x: f64,
    pub y: f64,
    pub hdg: f64,
    pub length: f64,
    pub kind: GeometryKind,
}

/// Setzt betragsmäßig kleine Krümmungen auf exakt 0.
pub fn snap_curvature(curvature: f64, epsilon: f64) -> f64 {
    if curvature.abs() < epsilon {
        0.0
    } else {
        curvature
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { field, value })
    }
}

fn check_polynomial(field: &'static str, poly: &CubicPolynomial) -> Result<(), GeometryError> {
    for value in [poly.a, poly.b, poly.c, poly.d] {
        check_finite(field, value)?;
    }
    Ok(())
}

impl RoadGeometry {
    /// Erstellt ein Segment und prüft die Header-Werte.
    pub fn new(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        kind: GeometryKind,
    ) -> Result<Self, GeometryError> {
        check_finite("s", s)?;
        check_finite("x", x)?;
        check_finite("y", y)?;
        check_finite("hdg", hdg)?;
        check_finite("length", length)?;
        if s < 0.0 {
            return Err(GeometryError::NegativeStart(s));
        }
        if length < 0.0 {
            return Err(GeometryError::NegativeLength(length));
        }

        match &kind {
            GeometryKind::Line => {}
            GeometryKind::Arc { curvature } => {
                check_finite("curvature", *curvature)?;
            }
            GeometryKind::Spiral {
                curv_start,
                curv_end,
            } => {
                check_finite("curvStart", *curv_start)?;
                check_finite("curvEnd", *curv_end)?;
            }
            GeometryKind::Poly3(poly) => check_polynomial("poly3", poly)?,
            GeometryKind::ParamPoly3(params) => {
                check_polynomial("paramPoly3.u", &params.u)?;
                check_polynomial("paramPoly3.v", &params.v)?;
            }
        }

        Ok(Self {
            s,
            x,
            y,
            hdg,
            length,
            kind,
        })
    }

    pub fn line(s: f64, x: f64, y: f64, hdg: f64, length: f64) -> Result<Self, GeometryError> {
        Self::new(s, x, y, hdg, length, GeometryKind::Line)
    }

    pub fn arc(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        curvature: f64,
    ) -> Result<Self, GeometryError> {
        Self::new(s, x, y, hdg, length, GeometryKind::Arc { curvature })
    }

    /// Spirale mit Standard-Schwelle für das Krümmungs-Snapping.
    pub fn spiral(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        curv_start: f64,
        curv_end: f64,
    ) -> Result<Self, GeometryError> {
        Self::spiral_with_epsilon(
            s,
            x,
            y,
            hdg,
            length,
            curv_start,
            curv_end,
            SPIRAL_CURVATURE_EPSILON,
        )
    }

    /// Spirale; Krümmungen mit `|k| < epsilon` werden auf 0 gesetzt.
    #[allow(clippy::too_many_arguments)]
    pub fn spiral_with_epsilon(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        curv_start: f64,
        curv_end: f64,
        epsilon: f64,
    ) -> Result<Self, GeometryError> {
        Self::new(
            s,
            x,
            y,
            hdg,
            length,
            GeometryKind::Spiral {
                curv_start: snap_curvature(curv_start, epsilon),
                curv_end: snap_curvature(curv_end, epsilon),
            },
        )
    }

    pub fn poly3(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        poly: CubicPolynomial,
    ) -> Result<Self, GeometryError> {
        Self::new(s, x, y, hdg, length, GeometryKind::Poly3(poly))
    }

    pub fn param_poly3(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        params: ParamPoly3Parameters,
    ) -> Result<Self, GeometryError> {
        Self::new(s, x, y, hdg, length, GeometryKind::ParamPoly3(params))
    }

    /// Absolute Endposition `s + length` auf der Straße
    pub fn s_end(&self) -> f64 {
        self.s + self.length
    }

    pub fn start(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    fn clamp_offset(&self, s_offset: f64) -> f64 {
        if s_offset > self.length || s_offset < 0.0 {
            log::warn!(
                "sOffset {} liegt ausserhalb der Segmentlaenge {} ({} bei s={}), wird begrenzt",
                s_offset,
                self.length,
                self.kind.tag(),
                self.s
            );
            s_offset.clamp(0.0, self.length)
        } else {
            s_offset
        }
    }

    /// Lokale Position (u, v) und lokaler Kurs relativ zum Segmentstart.
    fn local_pose(&self, ds: f64) -> (DVec2, f64) {
        match self.kind {
            GeometryKind::Line => (DVec2::new(ds, 0.0), 0.0),
            GeometryKind::Arc { curvature } => arc_pose(curvature, ds),
            GeometryKind::Spiral {
                curv_start,
                curv_end,
            } => {
                if curv_start == 0.0 && curv_end == 0.0 {
                    (DVec2::new(ds, 0.0), 0.0)
                } else if (curv_start - curv_end).abs() < SPIRAL_ARC_TOLERANCE {
                    arc_pose(curv_start, ds)
                } else {
                    let rate = self.spiral_rate(curv_start, curv_end);
                    (
                        spiral::local_position(curv_start, rate, ds),
                        spiral::heading(curv_start, rate, ds),
                    )
                }
            }
            GeometryKind::Poly3(poly) => {
                let u = poly3_u_for_arc_length(&poly, ds);
                (DVec2::new(u, poly.value(u)), poly.slope(u).atan())
            }
            GeometryKind::ParamPoly3(params) => {
                let p = self.param_for_offset(&params, ds);
                let tangent = DVec2::new(params.u.slope(p), params.v.slope(p));
                let heading = if tangent.length_squared() > 0.0 {
                    tangent.y.atan2(tangent.x)
                } else {
                    0.0
                };
                (DVec2::new(params.u.value(p), params.v.value(p)), heading)
            }
        }
    }

    fn spiral_rate(&self, curv_start: f64, curv_end: f64) -> f64 {
        if self.length > 0.0 {
            (curv_end - curv_start) / self.length
        } else {
            0.0
        }
    }

    fn param_for_offset(&self, params: &ParamPoly3Parameters, ds: f64) -> f64 {
        match params.range {
            ParamRange::ArcLength => ds,
            ParamRange::Normalized if self.length > 0.0 => ds / self.length,
            ParamRange::Normalized => 0.0,
        }
    }

    /// Weltposition am lokalen Offset `s_offset`, seitlich um `t_offset` verschoben
    /// (positiv = links in Fahrtrichtung der Referenzlinie).
    pub fn coord(&self, s_offset: f64, t_offset: f64) -> DVec2 {
        let ds = self.clamp_offset(s_offset);
        let (local, local_heading) = self.local_pose(ds);
        let rotation = DVec2::from_angle(self.hdg);
        let on_line = self.start() + rotation.rotate(local);
        let normal = DVec2::from_angle(self.hdg + local_heading).perp();
        on_line + normal * t_offset
    }

    /// Welt-Kurswinkel am lokalen Offset
    pub fn heading(&self, s_offset: f64) -> f64 {
        let ds = self.clamp_offset(s_offset);
        self.hdg + self.local_pose(ds).1
    }

    /// Krümmung am lokalen Offset (positiv = Linkskurve)
    pub fn curvature(&self, s_offset: f64) -> f64 {
        let ds = self.clamp_offset(s_offset);
        match self.kind {
            GeometryKind::Line => 0.0,
            GeometryKind::Arc { curvature } => curvature,
            GeometryKind::Spiral {
                curv_start,
                curv_end,
            } => curv_start + self.spiral_rate(curv_start, curv_end) * ds,
            GeometryKind::Poly3(poly) => {
                let u = poly3_u_for_arc_length(&poly, ds);
                let slope = poly.slope(u);
                poly.second_derivative(u) / (1.0 + slope * slope).powf(1.5)
            }
            GeometryKind::ParamPoly3(params) => {
                let p = self.param_for_offset(&params, ds);
                let du = params.u.slope(p);
                let dv = params.v.slope(p);
                let ddu = params.u.second_derivative(p);
                let ddv = params.v.second_derivative(p);
                let norm = (du * du + dv * dv).powf(1.5);
                if norm > 0.0 {
                    (du * ddv - dv * ddu) / norm
                } else {
                    0.0
                }
            }
        }
    }
}

fn arc_pose(curvature: f64, ds: f64) -> (DVec2, f64) {
    if curvature.abs() < ARC_LINE_TOLERANCE {
        return (DVec2::new(ds, 0.0), 0.0);
    }
    let angle = curvature * ds;
    (
        DVec2::new(angle.sin() / curvature, (1.0 - angle.cos()) / curvature),
        angle,
    )
}

/// Bogenlänge von `v(u)` zwischen 0 und `u`.
fn poly3_arc_length(poly: &CubicPolynomial, u: f64) -> f64 {
    if u == 0.0 {
        return 0.0;
    }
    let speed = |x: f64| {
        let slope = poly.slope(x);
        (1.0 + slope * slope).sqrt()
    };
    let step = u / POLY3_SIMPSON_INTERVALS as f64;
    let mut sum = speed(0.0) + speed(u);
    for i in 1..POLY3_SIMPSON_INTERVALS {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += speed(i as f64 * step) * weight;
    }
    sum * step / 3.0
}

/// Sucht `u` so, dass die Bogenlänge von `v(u)` gleich `ds` ist (Newton).
fn poly3_u_for_arc_length(poly: &CubicPolynomial, ds: f64) -> f64 {
    if ds <= 0.0 {
        return 0.0;
    }
    let mut u = ds;
    for _ in 0..POLY3_NEWTON_ITERATIONS {
        let slope = poly.slope(u);
        let error = poly3_arc_length(poly, u) - ds;
        if error.abs() < 1e-9 {
            break;
        }
        u = (u - error / (1.0 + slope * slope).sqrt()).max(0.0);
    }
    u
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_line_coord_with_lateral_offset() {
        let line = RoadGeometry::line(0.0, 10.0, 5.0, FRAC_PI_2, 100.0).unwrap();
        let pos = line.coord(20.0, 2.0);
        // Kurs nach +y, links ist -x
        assert_abs_diff_eq!(pos.x, 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.y, 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(line.heading(20.0), FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(line.curvature(20.0), 0.0);
    }

    #[test]
    fn test_arc_quarter_circle() {
        let radius = 10.0;
        let arc = RoadGeometry::arc(0.0, 0.0, 0.0, 0.0, radius * FRAC_PI_2, 1.0 / radius).unwrap();
        let end = arc.coord(arc.length, 0.0);
        assert_abs_diff_eq!(end.x, radius, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, radius, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.heading(arc.length), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_arc_turns_right() {
        let arc = RoadGeometry::arc(0.0, 0.0, 0.0, 0.0, 10.0 * PI, -0.1).unwrap();
        let end = arc.coord(arc.length, 0.0);
        assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spiral_curvature_snapping() {
        let snapped = RoadGeometry::spiral(0.0, 0.0, 0.0, 0.0, 50.0, 5e-8, 0.01).unwrap();
        let kept = RoadGeometry::spiral(0.0, 0.0, 0.0, 0.0, 50.0, 5e-6, 0.01).unwrap();

        assert_eq!(
            snapped.kind,
            GeometryKind::Spiral {
                curv_start: 0.0,
                curv_end: 0.01
            }
        );
        assert_eq!(
            kept.kind,
            GeometryKind::Spiral {
                curv_start: 5e-6,
                curv_end: 0.01
            }
        );
    }

    #[test]
    fn test_spiral_curvature_grows_linearly() {
        let spiral = RoadGeometry::spiral(0.0, 0.0, 0.0, 0.0, 100.0, 0.0, 0.02).unwrap();
        assert_abs_diff_eq!(spiral.curvature(50.0), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(spiral.heading(100.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spiral_with_equal_curvatures_behaves_like_arc() {
        let spiral = RoadGeometry::spiral(0.0, 0.0, 0.0, 0.0, 30.0, 0.05, 0.05).unwrap();
        let arc = RoadGeometry::arc(0.0, 0.0, 0.0, 0.0, 30.0, 0.05).unwrap();
        let a = spiral.coord(30.0, 0.0);
        let b = arc.coord(30.0, 0.0);
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
    }

    #[test]
    fn test_poly3_straight_offset() {
        let poly = CubicPolynomial::new(1.5, 0.0, 0.0, 0.0);
        let geometry = RoadGeometry::poly3(0.0, 0.0, 0.0, 0.0, 10.0, poly).unwrap();
        let pos = geometry.coord(4.0, 0.0);
        assert_abs_diff_eq!(pos.x, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.y, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_poly3_sloped_line_walks_arc_length() {
        // v = u  →  Bogenlänge ist u·√2
        let poly = CubicPolynomial::new(0.0, 1.0, 0.0, 0.0);
        let geometry = RoadGeometry::poly3(0.0, 0.0, 0.0, 0.0, 10.0, poly).unwrap();
        let pos = geometry.coord(2.0_f64.sqrt(), 0.0);
        assert_abs_diff_eq!(pos.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pos.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_param_poly3_normalized_and_arc_length() {
        let normalized = ParamPoly3Parameters {
            u: CubicPolynomial::new(0.0, 20.0, 0.0, 0.0),
            v: CubicPolynomial::default(),
            range: ParamRange::Normalized,
        };
        let geometry = RoadGeometry::param_poly3(0.0, 1.0, 2.0, 0.0, 20.0, normalized).unwrap();
        let pos = geometry.coord(10.0, 0.0);
        assert_abs_diff_eq!(pos.x, 11.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.y, 2.0, epsilon = 1e-9);

        let arc_length = ParamPoly3Parameters {
            u: CubicPolynomial::new(0.0, 1.0, 0.0, 0.0),
            v: CubicPolynomial::default(),
            range: ParamRange::ArcLength,
        };
        let geometry = RoadGeometry::param_poly3(0.0, 1.0, 2.0, 0.0, 20.0, arc_length).unwrap();
        let pos = geometry.coord(10.0, 0.0);
        assert_abs_diff_eq!(pos.x, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn test_offset_beyond_length_is_clamped() {
        let line = RoadGeometry::line(0.0, 0.0, 0.0, 0.0, 10.0).unwrap();
        let pos = line.coord(15.0, 0.0);
        assert_abs_diff_eq!(pos.x, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        assert_eq!(
            RoadGeometry::line(0.0, 0.0, 0.0, 0.0, -1.0),
            Err(GeometryError::NegativeLength(-1.0))
        );
        assert!(matches!(
            RoadGeometry::line(0.0, f64::NAN, 0.0, 0.0, 1.0),
            Err(GeometryError::NonFinite { field: "x", .. })
        ));
        assert_eq!(
            RoadGeometry::line(-0.5, 0.0, 0.0, 0.0, 1.0),
            Err(GeometryError::NegativeStart(-0.5))
        );
    }
}
