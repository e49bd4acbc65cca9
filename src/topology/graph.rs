//! Gerichteter Lane-Graph über alle Lane-Sections der Szenerie.
//!
//! Ein Knoten ist eine Lane in einer Lane-Section. Nachfolger-Kanten
//! verlassen die Section am Ende (steigendes `s`), Vorgänger-Kanten am
//! Anfang. Jede Kante merkt sich, ob die Ziel-Lane in Richtung steigender
//! `s` befahren wird.

use indexmap::IndexMap;

use super::TopologyError;
use crate::core::{ContactPoint, LinkKind, Road, RoadLinkElementType, Scenery};

/// Eine Lane in einer Lane-Section
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneNode {
    pub road_id: String,
    /// Index der Lane-Section in der Straße
    pub section: usize,
    pub lane_id: i32,
}

impl LaneNode {
    pub fn new(road_id: impl Into<String>, section: usize, lane_id: i32) -> Self {
        Self {
            road_id: road_id.into(),
            section,
            lane_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneEdge {
    /// Index des Ziel-Knotens
    pub target: usize,
    /// Ziel wird in Richtung steigender `s` befahren
    pub target_in_stream: bool,
}

#[derive(Debug, Clone, Default)]
struct Adjacency {
    successors: Vec<LaneEdge>,
    predecessors: Vec<LaneEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct LaneGraph {
    nodes: IndexMap<LaneNode, Adjacency>,
}

impl LaneGraph {
    /// Baut den Graphen aus Lane-Links, Road-Links und Junction-Connections.
    ///
    /// Road-Links auf unbekannte Straßen oder Junctions werden übersprungen.
    /// Ein Lane-Link auf eine fehlende Lane ist ein Fehler.
    pub fn build(scenery: &Scenery) -> Result<Self, TopologyError> {
        let mut graph = Self::default();
        for road in scenery.roads() {
            for (index, section) in road.lane_sections().iter().enumerate() {
                for lane in section.lanes().filter(|lane| lane.id != 0) {
                    graph
                        .nodes
                        .insert(LaneNode::new(road.id(), index, lane.id), Adjacency::default());
                }
            }
        }

        for road in scenery.roads() {
            graph.link_road(scenery, road)?;
        }

        log::debug!(
            "Lane-Graph: {} Knoten, {} Kanten",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn link_road(&mut self, scenery: &Scenery, road: &Road) -> Result<(), TopologyError> {
        let sections = road.lane_sections();
        let last = sections.len().saturating_sub(1);

        for (index, section) in sections.iter().enumerate() {
            for lane in section.lanes().filter(|lane| lane.id != 0) {
                let source = LaneNode::new(road.id(), index, lane.id);

                for kind in [LinkKind::Successor, LinkKind::Predecessor] {
                    let (lane_link, inner) = match kind {
                        LinkKind::Successor => (lane.successor(), (index < last).then_some(index + 1)),
                        LinkKind::Predecessor => (lane.predecessor(), index.checked_sub(1)),
                    };

                    let targets: Vec<(LaneNode, bool)> = match inner {
                        Some(next) => lane_link
                            .map(|target| (LaneNode::new(road.id(), next, target), kind == LinkKind::Successor))
                            .into_iter()
                            .collect(),
                        None => external_targets(scenery, road, kind, lane.id, lane_link),
                    };

                    for (target, target_in_stream) in targets {
                        self.connect(&source, kind, &target, target_in_stream)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn connect(
        &mut self,
        source: &LaneNode,
        kind: LinkKind,
        target: &LaneNode,
        target_in_stream: bool,
    ) -> Result<(), TopologyError> {
        let Some(target_index) = self.nodes.get_index_of(target) else {
            return Err(TopologyError::BrokenLaneChain {
                road_id: source.road_id.clone(),
                section: source.section,
                lane_id: source.lane_id,
                target: target.lane_id,
            });
        };
        let Some(adjacency) = self.nodes.get_mut(source) else {
            return Ok(());
        };

        let edges = match kind {
            LinkKind::Successor => &mut adjacency.successors,
            LinkKind::Predecessor => &mut adjacency.predecessors,
        };
        let edge = LaneEdge {
            target: target_index,
            target_in_stream,
        };
        if !edges.contains(&edge) {
            edges.push(edge);
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes
            .values()
            .map(|adjacency| adjacency.successors.len() + adjacency.predecessors.len())
            .sum()
    }

    pub fn node(&self, index: usize) -> Option<&LaneNode> {
        self.nodes.get_index(index).map(|(node, _)| node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LaneNode> {
        self.nodes.keys()
    }

    pub fn index_of(&self, road_id: &str, section: usize, lane_id: i32) -> Option<usize> {
        self.nodes
            .get_index_of(&LaneNode::new(road_id, section, lane_id))
    }

    pub fn successors(&self, index: usize) -> &[LaneEdge] {
        self.nodes
            .get_index(index)
            .map_or(&[], |(_, adjacency)| adjacency.successors.as_slice())
    }

    pub fn predecessors(&self, index: usize) -> &[LaneEdge] {
        self.nodes
            .get_index(index)
            .map_or(&[], |(_, adjacency)| adjacency.predecessors.as_slice())
    }

    /// Kanten in Fahrtrichtung: Nachfolger bei `in_stream`, sonst Vorgänger
    pub fn next(&self, index: usize, in_stream: bool) -> &[LaneEdge] {
        if in_stream {
            self.successors(index)
        } else {
            self.predecessors(index)
        }
    }
}

/// Ziele jenseits der ersten bzw. letzten Section über den Road-Link.
fn external_targets(
    scenery: &Scenery,
    road: &Road,
    kind: LinkKind,
    lane_id: i32,
    lane_link: Option<i32>,
) -> Vec<(LaneNode, bool)> {
    let Some(link) = road.link(kind) else {
        return Vec::new();
    };

    match link.element_type {
        RoadLinkElementType::Road => {
            let Some(target_road) = scenery.road(&link.element_id) else {
                log::debug!(
                    "Straße {}: Road-Link auf unbekannte Straße {}",
                    road.id(),
                    link.element_id
                );
                return Vec::new();
            };
            lane_link
                .and_then(|target_lane| entry_node(target_road, link.contact_point, target_lane))
                .into_iter()
                .collect()
        }
        RoadLinkElementType::Junction => {
            let Some(junction) = scenery.junction(&link.element_id) else {
                log::debug!(
                    "Straße {}: Road-Link auf unbekannte Junction {}",
                    road.id(),
                    link.element_id
                );
                return Vec::new();
            };
            junction
                .connections()
                .filter(|connection| connection.incoming_road() == road.id())
                .filter_map(|connection| {
                    let target_lane = connection.linked_lane(lane_id)?;
                    let connecting = scenery.road(connection.connecting_road())?;
                    entry_node(connecting, connection.contact_point(), target_lane)
                })
                .collect()
        }
    }
}

/// Einstiegs-Knoten einer Straße am Kontaktpunkt
fn entry_node(road: &Road, contact_point: ContactPoint, lane_id: i32) -> Option<(LaneNode, bool)> {
    let sections = road.lane_sections().len();
    if sections == 0 {
        return None;
    }
    match contact_point {
        ContactPoint::Start => Some((LaneNode::new(road.id(), 0, lane_id), true)),
        ContactPoint::End => Some((LaneNode::new(road.id(), sections - 1, lane_id), false)),
        ContactPoint::Undefined => None,
    }
}
