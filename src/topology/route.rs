//! Routen-relative Abfragen: relative Lanes, Distanz bis Lane-Ende und
//! Verkehrszeichen in Reichweite.
//!
//! Distanzen werden entlang der Route ab der Startposition gemessen.
//! Relative Lane-IDs: 0 ist die Ego-Lane, positive IDs liegen in
//! Fahrtrichtung links.

use serde::Serialize;

use super::{LaneGraph, TopologyError};
use crate::core::{LaneSection, Road, RoadSignalSpecification, Scenery};

/// Ein Element der Route: Straße und Befahrungsrichtung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteElement {
    pub road_id: String,
    /// Straße wird in Richtung steigender `s` befahren
    pub in_stream: bool,
}

impl RouteElement {
    pub fn new(road_id: impl Into<String>, in_stream: bool) -> Self {
        Self {
            road_id: road_id.into(),
            in_stream,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeLane {
    pub lane_id: i32,
    pub relative_id: i32,
    /// Lane wird in Fahrtrichtung der Route befahren (Rechtsverkehr)
    pub in_driving_direction: bool,
    /// Relative ID in der vorherigen Section der Route
    pub predecessor: Option<i32>,
    /// Relative ID in der nächsten Section der Route
    pub successor: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeLaneSection {
    pub road_id: String,
    pub section: usize,
    pub in_stream: bool,
    pub start_distance: f64,
    pub end_distance: f64,
    /// Aufsteigend nach relativer ID (von rechts nach links)
    pub lanes: Vec<RelativeLane>,
}

/// Verkehrszeichen vor dem Ego-Fahrzeug
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSignInRange<'a> {
    pub road_id: &'a str,
    pub distance: f64,
    pub signal: &'a RoadSignalSpecification,
}

/// Relative ID von `lane_id` gegenüber der Ego-Lane.
///
/// Die Mittellane 0 wird übersprungen: -1 und 1 sind direkte Nachbarn.
pub fn relative_id(lane_id: i32, ego_lane_id: i32, in_stream: bool) -> i32 {
    let lateral = |id: i32| if id > 0 { id } else { id + 1 };
    let offset = lateral(lane_id) - lateral(ego_lane_id);
    if in_stream { offset } else { -offset }
}

/// Eine befahrene Lane-Section mit der Ego-Lane darin
struct Step<'a> {
    road: &'a Road,
    section_index: usize,
    section: &'a LaneSection,
    in_stream: bool,
    ego_lane: i32,
    ego_node: usize,
    /// Routen-Distanz bei `s = 0` der Straße
    base: f64,
    start_distance: f64,
    end_distance: f64,
}

impl Step<'_> {
    fn distance_at(&self, s: f64) -> f64 {
        if self.in_stream {
            self.base + s
        } else {
            self.base - s
        }
    }
}

struct Walk<'a> {
    steps: Vec<Step<'a>>,
    /// Ego-Lane setzt sich hinter der letzten Section fort
    continues: bool,
}

/// Verfolgt die Ego-Lane entlang der Route, bis sie endet oder die Route zu Ende ist.
fn walk<'a>(
    scenery: &'a Scenery,
    graph: &LaneGraph,
    route: &[RouteElement],
    start_lane: i32,
    start_s: f64,
) -> Result<Walk<'a>, TopologyError> {
    let first = route.first().ok_or(TopologyError::EmptyRoute)?;
    let first_road = scenery
        .road(&first.road_id)
        .ok_or_else(|| TopologyError::UnknownRoad(first.road_id.clone()))?;
    if !(0.0..=first_road.length()).contains(&start_s) {
        return Err(TopologyError::PositionOutsideRoad {
            road_id: first.road_id.clone(),
            s: start_s,
        });
    }
    let start_section = first_road.lane_section_index_at(start_s).ok_or_else(|| {
        TopologyError::PositionOutsideRoad {
            road_id: first.road_id.clone(),
            s: start_s,
        }
    })?;

    let mut steps: Vec<Step<'a>> = Vec::new();
    let mut offset = 0.0;

    for (position, element) in route.iter().enumerate() {
        let road = scenery
            .road(&element.road_id)
            .ok_or_else(|| TopologyError::UnknownRoad(element.road_id.clone()))?;
        let count = road.lane_sections().len();

        let (base, order): (f64, Vec<usize>) = match (position == 0, element.in_stream) {
            (true, true) => (-start_s, (start_section..count).collect()),
            (true, false) => (start_s, (0..=start_section).rev().collect()),
            (false, true) => (offset, (0..count).collect()),
            (false, false) => (offset + road.length(), (0..count).rev().collect()),
        };

        for (order_index, section_index) in order.into_iter().enumerate() {
            let Some(section) = road.lane_section(section_index) else {
                continue;
            };

            let ego_node = match steps.last() {
                None => Some(
                    graph
                        .index_of(road.id(), section_index, start_lane)
                        .ok_or_else(|| TopologyError::UnknownLane {
                            road_id: road.id().to_string(),
                            lane_id: start_lane,
                            s: start_s,
                        })?,
                ),
                Some(previous) => {
                    if order_index == 0 {
                        check_transition(graph, previous, road, element)?;
                    }
                    follow(graph, previous, road.id(), section_index, element.in_stream)
                }
            };
            let Some(ego_node) = ego_node else {
                log::debug!(
                    "Ego-Lane endet vor Straße {}, Section {}",
                    road.id(),
                    section_index
                );
                return Ok(Walk {
                    steps,
                    continues: false,
                });
            };
            let ego_lane = graph
                .node(ego_node)
                .map_or(start_lane, |node| node.lane_id);

            let section_end = road.section_end(section_index).unwrap_or(section.start);
            let mut step = Step {
                road,
                section_index,
                section,
                in_stream: element.in_stream,
                ego_lane,
                ego_node,
                base,
                start_distance: 0.0,
                end_distance: 0.0,
            };
            let (near, far) = if element.in_stream {
                (section.start, section_end)
            } else {
                (section_end, section.start)
            };
            step.start_distance = step.distance_at(near);
            step.end_distance = step.distance_at(far);
            steps.push(step);
        }

        offset = if element.in_stream {
            base + road.length()
        } else {
            base
        };
    }

    let continues = steps
        .last()
        .is_some_and(|last| !graph.next(last.ego_node, last.in_stream).is_empty());
    Ok(Walk { steps, continues })
}

/// Nachfolger der Ego-Lane in der angegebenen Section
fn follow(
    graph: &LaneGraph,
    previous: &Step<'_>,
    road_id: &str,
    section_index: usize,
    in_stream: bool,
) -> Option<usize> {
    graph
        .next(previous.ego_node, previous.in_stream)
        .iter()
        .find(|edge| {
            edge.target_in_stream == in_stream
                && graph.node(edge.target).is_some_and(|node| {
                    node.road_id == road_id && node.section == section_index
                })
        })
        .map(|edge| edge.target)
}

/// Prüft, dass die Route über irgendeine Lane auf die nächste Straße führt.
fn check_transition(
    graph: &LaneGraph,
    previous: &Step<'_>,
    road: &Road,
    element: &RouteElement,
) -> Result<(), TopologyError> {
    let mut connected = false;
    for lane in previous.section.lanes().filter(|lane| lane.id != 0) {
        let Some(index) = graph.index_of(previous.road.id(), previous.section_index, lane.id) else {
            continue;
        };
        for edge in graph.next(index, previous.in_stream) {
            if graph
                .node(edge.target)
                .is_some_and(|node| node.road_id == road.id())
            {
                if edge.target_in_stream == element.in_stream {
                    return Ok(());
                }
                connected = true;
            }
        }
    }

    let from = previous.road.id().to_string();
    let to = road.id().to_string();
    if connected {
        Err(TopologyError::InconsistentDirection { from, to })
    } else {
        Err(TopologyError::RouteNotConnected { from, to })
    }
}

/// Relative Lane-Sicht entlang der Route, ausgehend von `start_lane` bei `start_s`.
///
/// Endet die Ego-Lane vor dem Ende der Route, endet auch die Sicht.
pub fn relative_lanes(
    scenery: &Scenery,
    graph: &LaneGraph,
    route: &[RouteElement],
    start_lane: i32,
    start_s: f64,
) -> Result<Vec<RelativeLaneSection>, TopologyError> {
    let walk = walk(scenery, graph, route, start_lane, start_s)?;

    let sections = walk
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let previous = index.checked_sub(1).and_then(|p| walk.steps.get(p));
            let next = walk.steps.get(index + 1);

            let mut lanes: Vec<RelativeLane> = step
                .section
                .lanes()
                .filter(|lane| lane.id != 0)
                .map(|lane| {
                    let node = graph.index_of(step.road.id(), step.section_index, lane.id);
                    RelativeLane {
                        lane_id: lane.id,
                        relative_id: relative_id(lane.id, step.ego_lane, step.in_stream),
                        in_driving_direction: (lane.id < 0) == step.in_stream,
                        predecessor: node
                            .and_then(|n| neighbour(graph, n, !step.in_stream, previous)),
                        successor: node.and_then(|n| neighbour(graph, n, step.in_stream, next)),
                    }
                })
                .collect();
            lanes.sort_by_key(|lane| lane.relative_id);

            RelativeLaneSection {
                road_id: step.road.id().to_string(),
                section: step.section_index,
                in_stream: step.in_stream,
                start_distance: step.start_distance,
                end_distance: step.end_distance,
                lanes,
            }
        })
        .collect();
    Ok(sections)
}

/// Relative ID der verknüpften Lane in der Nachbar-Section `target`
fn neighbour(graph: &LaneGraph, node: usize, in_stream: bool, target: Option<&Step<'_>>) -> Option<i32> {
    let target = target?;
    graph.next(node, in_stream).iter().find_map(|edge| {
        let linked = graph.node(edge.target)?;
        (linked.road_id == target.road.id() && linked.section == target.section_index)
            .then(|| relative_id(linked.lane_id, target.ego_lane, target.in_stream))
    })
}

/// Distanz bis zum Ende der Ego-Lane entlang der Route.
///
/// Setzt sich die Lane hinter dem letzten Routen-Element fort, ist das
/// Ergebnis `f64::INFINITY`.
pub fn distance_to_lane_end(
    scenery: &Scenery,
    graph: &LaneGraph,
    route: &[RouteElement],
    start_lane: i32,
    start_s: f64,
) -> Result<f64, TopologyError> {
    let walk = walk(scenery, graph, route, start_lane, start_s)?;
    if walk.continues {
        return Ok(f64::INFINITY);
    }
    Ok(walk.steps.last().map_or(0.0, |step| step.end_distance))
}

/// Signale vor dem Ego-Fahrzeug bis zur Distanz `range`, nach Distanz sortiert.
///
/// Berücksichtigt werden nur Signale, die in Fahrtrichtung wirken und deren
/// Gültigkeit die jeweilige Ego-Lane umfasst.
pub fn traffic_signs_in_range<'a>(
    scenery: &'a Scenery,
    graph: &LaneGraph,
    route: &[RouteElement],
    start_lane: i32,
    start_s: f64,
    range: f64,
) -> Result<Vec<TrafficSignInRange<'a>>, TopologyError> {
    let walk = walk(scenery, graph, route, start_lane, start_s)?;

    let mut signs = Vec::new();
    for step in &walk.steps {
        for signal in step.road.signals() {
            if step.road.lane_section_index_at(signal.s) != Some(step.section_index) {
                continue;
            }
            let distance = step.distance_at(signal.s);
            let facing = signal
                .orientation_value()
                .is_some_and(|orientation| orientation.applies_to(step.in_stream));
            if (0.0..=range).contains(&distance) && facing && signal.validity.covers(step.ego_lane) {
                signs.push(TrafficSignInRange {
                    road_id: step.road.id(),
                    distance,
                    signal,
                });
            }
        }
    }
    signs.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(signs)
}
