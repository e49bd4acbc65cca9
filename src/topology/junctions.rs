//! Abfragen auf Junctions: Connections, Vorfahrt und sich kreuzende
//! Verbindungsstraßen.

use glam::DVec2;

use super::TopologyError;
use crate::core::{Connection, Junction, Priority, Road, Scenery};

/// Toleranz für Schnittpunkte und gemeinsame Endpunkte in Metern
const INTERSECTION_TOLERANCE: f64 = 1e-3;
/// Obergrenze der Abtast-Abschnitte je Verbindungsstraße
const MAX_SAMPLES_PER_ROAD: usize = 1_000;

/// Zwei Verbindungsstraßen einer Junction, deren Referenzlinien sich kreuzen.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionIntersection {
    pub road_a: String,
    pub road_b: String,
    /// Position auf `road_a`
    pub s_a: f64,
    /// Position auf `road_b`
    pub s_b: f64,
    pub point: DVec2,
}

fn junction<'a>(scenery: &'a Scenery, junction_id: &str) -> Result<&'a Junction, TopologyError> {
    scenery
        .junction(junction_id)
        .ok_or_else(|| TopologyError::UnknownJunction(junction_id.to_string()))
}

/// Connections der Junction, die von `road_id` ausgehen (Dokument-Reihenfolge)
pub fn outgoing_connections<'a>(
    scenery: &'a Scenery,
    junction_id: &str,
    road_id: &str,
) -> Result<Vec<&'a Connection>, TopologyError> {
    let junction = junction(scenery, junction_id)?;
    if scenery.road(road_id).is_none() {
        return Err(TopologyError::UnknownRoad(road_id.to_string()));
    }
    Ok(junction
        .connections()
        .filter(|connection| connection.incoming_road() == road_id)
        .collect())
}

/// Vorfahrtsregeln der Junction, unverändert wie importiert
pub fn junction_priorities<'a>(
    scenery: &'a Scenery,
    junction_id: &str,
) -> Result<&'a [Priority], TopologyError> {
    Ok(junction(scenery, junction_id)?.priorities())
}

/// Stützpunkte der Referenzlinie im Abstand `step`, inklusive Endpunkt.
///
/// Höchstens [`MAX_SAMPLES_PER_ROAD`] Abschnitte; zu kleine Schrittweiten werden vergrößert.
fn sample_reference_line(road: &Road, step: f64) -> Vec<(f64, DVec2)> {
    let length = road.length();
    let step = step.max(length / MAX_SAMPLES_PER_ROAD as f64);
    let count = ((length / step).ceil() as usize).clamp(1, MAX_SAMPLES_PER_ROAD);
    (0..=count)
        .filter_map(|i| {
            let s = (i as f64 * step).min(length);
            road.position(s, 0.0).map(|point| (s, point))
        })
        .collect()
}

/// Schnittpunkte aller Paare von Verbindungsstraßen einer Junction.
///
/// Die Referenzlinien werden im Abstand `step` abgetastet. Kreuzungen an
/// gemeinsamen Start- oder Endpunkten werden ignoriert.
pub fn junction_intersections(
    scenery: &Scenery,
    junction_id: &str,
    step: f64,
) -> Result<Vec<JunctionIntersection>, TopologyError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(TopologyError::InvalidStep(step));
    }
    let junction = junction(scenery, junction_id)?;

    let mut roads: Vec<&Road> = Vec::new();
    for connection in junction.connections() {
        let road = scenery
            .road(connection.connecting_road())
            .ok_or_else(|| TopologyError::UnknownRoad(connection.connecting_road().to_string()))?;
        if !roads.iter().any(|known| known.id() == road.id()) {
            roads.push(road);
        }
    }

    let polylines: Vec<Vec<(f64, DVec2)>> = roads
        .iter()
        .map(|road| sample_reference_line(road, step))
        .collect();

    let mut intersections = Vec::new();
    for a in 0..roads.len() {
        for b in (a + 1)..roads.len() {
            collect_crossings(
                roads[a].id(),
                &polylines[a],
                roads[b].id(),
                &polylines[b],
                &mut intersections,
            );
        }
    }

    log::debug!(
        "Junction {}: {} Verbindungsstraßen, {} Kreuzungen",
        junction_id,
        roads.len(),
        intersections.len()
    );
    Ok(intersections)
}

fn collect_crossings(
    id_a: &str,
    line_a: &[(f64, DVec2)],
    id_b: &str,
    line_b: &[(f64, DVec2)],
    out: &mut Vec<JunctionIntersection>,
) {
    let first_new = out.len();
    let endpoints = |line: &[(f64, DVec2)]| -> Vec<DVec2> {
        line.first()
            .into_iter()
            .chain(line.last())
            .map(|(_, point)| *point)
            .collect()
    };
    let ends_a = endpoints(line_a);
    let ends_b = endpoints(line_b);
    let near_any = |point: DVec2, ends: &[DVec2]| {
        ends.iter()
            .any(|end| end.distance(point) <= INTERSECTION_TOLERANCE)
    };

    for pair_a in line_a.windows(2) {
        let ((s_a1, a1), (s_a2, a2)) = (pair_a[0], pair_a[1]);
        for pair_b in line_b.windows(2) {
            let ((s_b1, b1), (s_b2, b2)) = (pair_b[0], pair_b[1]);
            if !segments_intersect(a1, a2, b1, b2) {
                continue;
            }
            let Some((t, u)) = crossing_parameters(a1, a2, b1, b2) else {
                continue;
            };

            let point = a1 + (a2 - a1) * t;
            if near_any(point, &ends_a) && near_any(point, &ends_b) {
                continue;
            }
            let s_a = s_a1 + (s_a2 - s_a1) * t;
            let s_b = s_b1 + (s_b2 - s_b1) * u;

            // Schnitt auf einem Stützpunkt wird von zwei Segmenten gemeldet
            let duplicate = out[first_new..].iter().any(|known| {
                (known.s_a - s_a).abs() <= INTERSECTION_TOLERANCE
                    && (known.s_b - s_b).abs() <= INTERSECTION_TOLERANCE
            });
            if !duplicate {
                out.push(JunctionIntersection {
                    road_a: id_a.to_string(),
                    road_b: id_b.to_string(),
                    s_a,
                    s_b,
                    point,
                });
            }
        }
    }
}

/// Parameter `(t, u)` des Schnittpunkts; `None` bei parallelen Segmenten
fn crossing_parameters(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> Option<(f64, f64)> {
    let da = a2 - a1;
    let db = b2 - b1;
    let denominator = da.perp_dot(db);
    if denominator.abs() <= f64::EPSILON {
        return None;
    }
    let offset = b1 - a1;
    let t = (offset.perp_dot(db) / denominator).clamp(0.0, 1.0);
    let u = (offset.perp_dot(da) / denominator).clamp(0.0, 1.0);
    Some((t, u))
}

fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    const EPS: f64 = 1e-9;
    (o1.abs() <= EPS && point_on_segment(b1, a1, a2))
        || (o2.abs() <= EPS && point_on_segment(b2, a1, a2))
        || (o3.abs() <= EPS && point_on_segment(a1, b1, b2))
        || (o4.abs() <= EPS && point_on_segment(a2, b1, b2))
}

fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn point_on_segment(point: DVec2, seg_start: DVec2, seg_end: DVec2) -> bool {
    const EPS: f64 = 1e-9;
    point.x >= seg_start.x.min(seg_end.x) - EPS
        && point.x <= seg_start.x.max(seg_end.x) + EPS
        && point.y >= seg_start.y.min(seg_end.y) - EPS
        && point.y <= seg_start.y.max(seg_end.y) + EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_intersect_crossing_and_touching() {
        let o = DVec2::ZERO;
        assert!(segments_intersect(
            o,
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 0.0)
        ));
        assert!(segments_intersect(
            o,
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 3.0)
        ));
        assert!(!segments_intersect(
            o,
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0)
        ));
    }

    #[test]
    fn test_crossing_parameters() {
        let (t, u) = crossing_parameters(
            DVec2::ZERO,
            DVec2::new(4.0, 0.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(1.0, 3.0),
        )
        .unwrap();
        assert!((t - 0.25).abs() < 1e-12);
        assert!((u - 0.25).abs() < 1e-12);

        assert!(
            crossing_parameters(DVec2::ZERO, DVec2::X, DVec2::Y, DVec2::new(1.0, 1.0)).is_none()
        );
    }
}
