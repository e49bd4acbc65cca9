//! Straße mit Referenzlinie, Höhenprofil, Lane-Sections, Objekten und Signalen.

use glam::DVec2;
use road_geometry::{
    evaluate_records, CubicPolynomial, GeometryError, ParamPoly3Parameters, PolynomialRecord,
    RoadGeometry,
};
use serde::Serialize;

use super::lane::LaneSection;
use super::object::RoadObjectSpecification;
use super::signal::RoadSignalSpecification;
use super::types::{ContactPoint, LinkKind, RoadLinkElementType, RoadTypeInformation};
use super::ModelError;

/// Junction-ID einer Straße, die zu keiner Junction gehört.
pub const NO_JUNCTION: &str = "-1";

/// Verknüpfung einer Straße mit Vorgänger oder Nachfolger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadLink {
    pub kind: LinkKind,
    pub element_type: RoadLinkElementType,
    pub element_id: String,
    /// Nur bei `element_type == Road` aufgelöst
    pub contact_point: ContactPoint,
}

/// Straßentyp ab Position `s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoadTypeSpecification {
    pub s: f64,
    pub road_type: RoadTypeInformation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    id: String,
    junction_id: String,
    geometries: Vec<RoadGeometry>,
    elevations: Vec<PolynomialRecord>,
    lane_offsets: Vec<PolynomialRecord>,
    lane_sections: Vec<LaneSection>,
    links: Vec<RoadLink>,
    objects: Vec<RoadObjectSpecification>,
    signals: Vec<RoadSignalSpecification>,
    road_types: Vec<RoadTypeSpecification>,
}

impl Road {
    /// Erstellt eine leere Straße ohne Junction-Zugehörigkeit
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            junction_id: NO_JUNCTION.to_string(),
            geometries: Vec::new(),
            elevations: Vec::new(),
            lane_offsets: Vec::new(),
            lane_sections: Vec::new(),
            links: Vec::new(),
            objects: Vec::new(),
            signals: Vec::new(),
            road_types: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn junction_id(&self) -> &str {
        &self.junction_id
    }

    pub fn set_junction_id(&mut self, junction_id: impl Into<String>) {
        self.junction_id = junction_id.into();
    }

    /// `true` wenn die Straße Teil einer Junction ist
    pub fn is_in_junction(&self) -> bool {
        self.junction_id != NO_JUNCTION
    }

    // ── Referenzlinie ───────────────────────────────────────────────

    /// Hängt ein Segment an; `s` darf gegenüber dem Vorgänger nicht abnehmen.
    pub fn add_geometry(&mut self, geometry: RoadGeometry) -> Result<(), ModelError> {
        if let Some(previous) = self.geometries.last() {
            if geometry.s < previous.s {
                return Err(GeometryError::DecreasingStart {
                    previous: previous.s,
                    s: geometry.s,
                }
                .into());
            }
        }
        self.geometries.push(geometry);
        Ok(())
    }

    pub fn add_geometry_line(
        &mut self,
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
    ) -> Result<(), ModelError> {
        self.add_geometry(RoadGeometry::line(s, x, y, hdg, length)?)
    }

    pub fn add_geometry_arc(
        &mut self,
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        curvature: f64,
    ) -> Result<(), ModelError> {
        self.add_geometry(RoadGeometry::arc(s, x, y, hdg, length, curvature)?)
    }

    /// Spirale; betragsmäßig kleine Krümmungen werden auf 0 gesetzt
    #[allow(clippy::too_many_arguments)]
    pub fn add_geometry_spiral(
        &mut self,
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        curv_start: f64,
        curv_end: f64,
    ) -> Result<(), ModelError> {
        self.add_geometry(RoadGeometry::spiral(
            s, x, y, hdg, length, curv_start, curv_end,
        )?)
    }

    pub fn add_geometry_poly3(
        &mut self,
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        poly: CubicPolynomial,
    ) -> Result<(), ModelError> {
        self.add_geometry(RoadGeometry::poly3(s, x, y, hdg, length, poly)?)
    }

    pub fn add_geometry_param_poly3(
        &mut self,
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        params: ParamPoly3Parameters,
    ) -> Result<(), ModelError> {
        self.add_geometry(RoadGeometry::param_poly3(s, x, y, hdg, length, params)?)
    }

    pub fn geometries(&self) -> &[RoadGeometry] {
        &self.geometries
    }

    /// Länge der Straße (Ende des letzten Segments)
    pub fn length(&self) -> f64 {
        self.geometries.last().map_or(0.0, RoadGeometry::s_end)
    }

    /// Segment, in dem `s` liegt
    pub fn geometry_at(&self, s: f64) -> Option<&RoadGeometry> {
        self.geometries
            .iter()
            .rev()
            .find(|geometry| geometry.s <= s)
            .or_else(|| self.geometries.first())
    }

    /// Weltposition bei `s`, seitlich um `t` zur Referenzlinie verschoben
    pub fn position(&self, s: f64, t: f64) -> Option<DVec2> {
        let geometry = self.geometry_at(s)?;
        Some(geometry.coord(s - geometry.s, t))
    }

    pub fn heading(&self, s: f64) -> Option<f64> {
        let geometry = self.geometry_at(s)?;
        Some(geometry.heading(s - geometry.s))
    }

    // ── Profile ─────────────────────────────────────────────────────

    fn push_profile(
        records: &mut Vec<PolynomialRecord>,
        field: &'static str,
        record: PolynomialRecord,
    ) -> Result<(), ModelError> {
        if !record.s.is_finite() || !record.polynomial.is_finite() {
            return Err(ModelError::InvalidValue {
                field,
                value: record.s,
            });
        }
        records.push(record);
        records.sort_by(|a, b| a.s.total_cmp(&b.s));
        Ok(())
    }

    pub fn add_elevation(&mut self, s: f64, a: f64, b: f64, c: f64, d: f64) -> Result<(), ModelError> {
        Self::push_profile(
            &mut self.elevations,
            "elevation",
            PolynomialRecord::new(s, a, b, c, d),
        )
    }

    pub fn add_lane_offset(&mut self, s: f64, a: f64, b: f64, c: f64, d: f64) -> Result<(), ModelError> {
        Self::push_profile(
            &mut self.lane_offsets,
            "laneOffset",
            PolynomialRecord::new(s, a, b, c, d),
        )
    }

    pub fn elevations(&self) -> &[PolynomialRecord] {
        &self.elevations
    }

    pub fn lane_offsets(&self) -> &[PolynomialRecord] {
        &self.lane_offsets
    }

    /// Höhe der Referenzlinie bei `s` (ohne Profil: 0)
    pub fn elevation(&self, s: f64) -> f64 {
        evaluate_records(&self.elevations, s)
    }

    /// Seitliche Verschiebung der Mittellane bei `s`
    pub fn lane_offset(&self, s: f64) -> f64 {
        evaluate_records(&self.lane_offsets, s)
    }

    // ── Lane-Sections ───────────────────────────────────────────────

    /// Fügt eine Lane-Section hinzu; `start` muss streng monoton steigen.
    pub fn add_lane_section(&mut self, start: f64) -> Result<&mut LaneSection, ModelError> {
        if !start.is_finite() {
            return Err(ModelError::InvalidValue {
                field: "laneSection.s",
                value: start,
            });
        }
        if let Some(previous) = self.lane_sections.last() {
            if start <= previous.start {
                return Err(ModelError::NonIncreasingLaneSection {
                    previous: previous.start,
                    s: start,
                });
            }
        }
        self.lane_sections.push(LaneSection::new(start));
        let index = self.lane_sections.len() - 1;
        Ok(&mut self.lane_sections[index])
    }

    pub fn lane_sections(&self) -> &[LaneSection] {
        &self.lane_sections
    }

    pub fn lane_section(&self, index: usize) -> Option<&LaneSection> {
        self.lane_sections.get(index)
    }

    pub fn lane_section_mut(&mut self, index: usize) -> Option<&mut LaneSection> {
        self.lane_sections.get_mut(index)
    }

    /// Index der Lane-Section, in der `s` liegt
    pub fn lane_section_index_at(&self, s: f64) -> Option<usize> {
        if self.lane_sections.is_empty() {
            return None;
        }
        let index = self
            .lane_sections
            .iter()
            .rposition(|section| section.start <= s)
            .unwrap_or(0);
        Some(index)
    }

    pub fn lane_section_at(&self, s: f64) -> Option<&LaneSection> {
        self.lane_section_index_at(s)
            .and_then(|index| self.lane_sections.get(index))
    }

    /// Ende einer Lane-Section (Start der nächsten bzw. Straßenende)
    pub fn section_end(&self, index: usize) -> Option<f64> {
        self.lane_sections.get(index)?;
        Some(
            self.lane_sections
                .get(index + 1)
                .map_or_else(|| self.length(), |next| next.start),
        )
    }

    pub fn section_length(&self, index: usize) -> Option<f64> {
        let start = self.lane_sections.get(index)?.start;
        Some((self.section_end(index)? - start).max(0.0))
    }

    /// Breite einer Lane bei `s`
    pub fn lane_width(&self, lane_id: i32, s: f64) -> Option<f64> {
        let section = self.lane_section_at(s)?;
        section.lane_width(lane_id, s - section.start)
    }

    /// Seitlicher Abstand der Lane-Mitte zur Referenzlinie bei `s` (inkl. Lane-Offset)
    pub fn lane_center_t(&self, lane_id: i32, s: f64) -> Option<f64> {
        let section = self.lane_section_at(s)?;
        let center = section.lane_center_offset(lane_id, s - section.start)?;
        Some(self.lane_offset(s) + center)
    }

    // ── Links ───────────────────────────────────────────────────────

    /// Setzt Vorgänger oder Nachfolger; jeder darf nur einmal gesetzt werden.
    pub fn add_link(&mut self, link: RoadLink) -> Result<(), ModelError> {
        if self.links.iter().any(|existing| existing.kind == link.kind) {
            return Err(ModelError::DuplicateRoadLink(match link.kind {
                LinkKind::Predecessor => "predecessor",
                LinkKind::Successor => "successor",
            }));
        }
        self.links.push(link);
        Ok(())
    }

    pub fn links(&self) -> &[RoadLink] {
        &self.links
    }

    pub fn predecessor(&self) -> Option<&RoadLink> {
        self.link(LinkKind::Predecessor)
    }

    pub fn successor(&self) -> Option<&RoadLink> {
        self.link(LinkKind::Successor)
    }

    pub fn link(&self, kind: LinkKind) -> Option<&RoadLink> {
        self.links.iter().find(|link| link.kind == kind)
    }

    // ── Objekte, Signale, Typen ─────────────────────────────────────

    pub fn add_road_object(&mut self, object: RoadObjectSpecification) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[RoadObjectSpecification] {
        &self.objects
    }

    pub fn add_road_signal(&mut self, signal: RoadSignalSpecification) {
        self.signals.push(signal);
    }

    pub fn signals(&self) -> &[RoadSignalSpecification] {
        &self.signals
    }

    pub fn add_road_type(&mut self, road_type: RoadTypeSpecification) {
        self.road_types.push(road_type);
        self.road_types.sort_by(|a, b| a.s.total_cmp(&b.s));
    }

    pub fn road_types(&self) -> &[RoadTypeSpecification] {
        &self.road_types
    }

    /// Straßentyp bei `s` (letzte Zone mit `zone.s <= s`)
    pub fn road_type_at(&self, s: f64) -> Option<RoadTypeInformation> {
        self.road_types
            .iter()
            .rev()
            .find(|zone| zone.s <= s)
            .map(|zone| zone.road_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Lane, LaneType};
    use approx::assert_relative_eq;

    fn straight_road() -> Road {
        let mut road = Road::new("1");
        road.add_geometry_line(0.0, 0.0, 0.0, 0.0, 50.0).unwrap();
        road.add_geometry_arc(50.0, 50.0, 0.0, 0.0, 20.0, 0.01).unwrap();
        road
    }

    #[test]
    fn test_geometry_must_not_decrease() {
        let mut road = straight_road();
        let err = road.add_geometry_line(10.0, 0.0, 0.0, 0.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            ModelError::Geometry(GeometryError::DecreasingStart {
                previous: 50.0,
                s: 10.0
            })
        );
    }

    #[test]
    fn test_length_and_position() {
        let road = straight_road();
        assert_relative_eq!(road.length(), 70.0);
        let pos = road.position(25.0, 1.0).unwrap();
        assert_relative_eq!(pos.x, 25.0);
        assert_relative_eq!(pos.y, 1.0);
        assert_eq!(road.geometry_at(55.0).map(|g| g.s), Some(50.0));
    }

    #[test]
    fn test_lane_sections_strictly_increasing() {
        let mut road = straight_road();
        road.add_lane_section(0.0).unwrap();
        road.add_lane_section(30.0).unwrap();
        assert!(matches!(
            road.add_lane_section(30.0),
            Err(ModelError::NonIncreasingLaneSection { .. })
        ));
        assert_eq!(road.lane_section_index_at(45.0), Some(1));
        assert_eq!(road.section_length(0), Some(30.0));
        assert_eq!(road.section_length(1), Some(40.0));
        assert_eq!(road.section_length(2), None);
    }

    #[test]
    fn test_lane_width_and_center_with_offset() {
        let mut road = straight_road();
        road.add_lane_offset(0.0, 0.5, 0.0, 0.0, 0.0).unwrap();
        let section = road.add_lane_section(0.0).unwrap();
        section
            .add_lane(Lane::new(-1, LaneType::Driving))
            .unwrap()
            .add_width(0.0, 3.0, 0.01, 0.0, 0.0)
            .unwrap();

        assert_relative_eq!(road.lane_width(-1, 10.0).unwrap(), 3.1);
        assert_relative_eq!(road.lane_center_t(-1, 0.0).unwrap(), -1.0);
    }

    #[test]
    fn test_profiles_and_road_types() {
        let mut road = straight_road();
        road.add_elevation(0.0, 1.0, 0.1, 0.0, 0.0).unwrap();
        road.add_road_type(RoadTypeSpecification {
            s: 20.0,
            road_type: RoadTypeInformation::Motorway,
        });
        road.add_road_type(RoadTypeSpecification {
            s: 0.0,
            road_type: RoadTypeInformation::Town,
        });

        assert_relative_eq!(road.elevation(10.0), 2.0);
        assert_eq!(road.lane_offset(10.0), 0.0);
        assert_eq!(road.road_type_at(5.0), Some(RoadTypeInformation::Town));
        assert_eq!(road.road_type_at(25.0), Some(RoadTypeInformation::Motorway));
    }

    #[test]
    fn test_links_are_unique_per_kind() {
        let mut road = Road::new("2");
        let link = RoadLink {
            kind: LinkKind::Successor,
            element_type: RoadLinkElementType::Road,
            element_id: "3".into(),
            contact_point: ContactPoint::Start,
        };
        road.add_link(link.clone()).unwrap();
        assert_eq!(
            road.add_link(link),
            Err(ModelError::DuplicateRoadLink("successor"))
        );
        assert_eq!(road.successor().map(|l| l.element_id.as_str()), Some("3"));
        assert!(road.predecessor().is_none());
        assert!(!road.is_in_junction());
    }
}
