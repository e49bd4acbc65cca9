//! Lanes, Fahrbahnmarkierungen und Lane-Sections.

use std::collections::BTreeMap;

use road_geometry::{evaluate_records, PolynomialRecord};
use serde::Serialize;

use super::types::{LaneChange, LaneSide, LaneType, RoadMarkColor, RoadMarkType, RoadMarkWeight};
use super::ModelError;

/// Fahrbahnmarkierung einer Lane, gültig von `s_offset` bis `s_end`
/// (beides relativ zum Start der Lane-Section).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadMark {
    pub s_offset: f64,
    /// Endet an der nächsten Markierung; die letzte Markierung ist offen
    pub s_end: f64,
    pub side: LaneSide,
    pub mark_type: RoadMarkType,
    pub color: RoadMarkColor,
    pub weight: RoadMarkWeight,
    pub lane_change: LaneChange,
}

impl RoadMark {
    pub fn new(s_offset: f64, side: LaneSide) -> Self {
        Self {
            s_offset,
            s_end: f64::INFINITY,
            side,
            mark_type: RoadMarkType::None,
            color: RoadMarkColor::White,
            weight: RoadMarkWeight::Standard,
            lane_change: LaneChange::Undefined,
        }
    }

    pub fn covers(&self, ds: f64) -> bool {
        ds >= self.s_offset && ds < self.s_end
    }
}

/// Eine Lane innerhalb einer Lane-Section.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub id: i32,
    pub lane_type: LaneType,
    /// Breiten-Polynome, `s` relativ zum Section-Start
    widths: Vec<PolynomialRecord>,
    /// Rand-Polynome (äußerer Rand), `s` relativ zum Section-Start
    borders: Vec<PolynomialRecord>,
    predecessor: Option<i32>,
    successor: Option<i32>,
    road_marks: Vec<RoadMark>,
}

impl Lane {
    pub fn new(id: i32, lane_type: LaneType) -> Self {
        Self {
            id,
            lane_type,
            widths: Vec::new(),
            borders: Vec::new(),
            predecessor: None,
            successor: None,
            road_marks: Vec::new(),
        }
    }

    pub fn side(&self) -> LaneSide {
        LaneSide::of_lane(self.id)
    }

    fn push_record(
        &mut self,
        border: bool,
        record: PolynomialRecord,
    ) -> Result<(), ModelError> {
        if self.id == 0 {
            return Err(ModelError::CenterLaneGeometry);
        }
        if !record.s.is_finite() || !record.polynomial.is_finite() {
            return Err(ModelError::InvalidValue {
                field: if border { "border" } else { "width" },
                value: record.s,
            });
        }
        let records = if border {
            &mut self.borders
        } else {
            &mut self.widths
        };
        records.push(record);
        records.sort_by(|a, b| a.s.total_cmp(&b.s));
        Ok(())
    }

    /// Fügt ein Breiten-Polynom hinzu
    pub fn add_width(&mut self, s_offset: f64, a: f64, b: f64, c: f64, d: f64) -> Result<(), ModelError> {
        self.push_record(false, PolynomialRecord::new(s_offset, a, b, c, d))
    }

    /// Fügt ein Rand-Polynom hinzu
    pub fn add_border(&mut self, s_offset: f64, a: f64, b: f64, c: f64, d: f64) -> Result<(), ModelError> {
        self.push_record(true, PolynomialRecord::new(s_offset, a, b, c, d))
    }

    pub fn widths(&self) -> &[PolynomialRecord] {
        &self.widths
    }

    pub fn borders(&self) -> &[PolynomialRecord] {
        &self.borders
    }

    /// Lane wird über Rand-Polynome beschrieben (nur wenn keine Breiten vorhanden sind)
    pub fn uses_border(&self) -> bool {
        self.widths.is_empty() && !self.borders.is_empty()
    }

    pub fn has_geometry(&self) -> bool {
        !self.widths.is_empty() || !self.borders.is_empty()
    }

    pub fn predecessor(&self) -> Option<i32> {
        self.predecessor
    }

    pub fn successor(&self) -> Option<i32> {
        self.successor
    }

    /// Setzt den Vorgänger; ein zweiter Vorgänger ist ein Fehler
    pub fn set_predecessor(&mut self, lane_id: i32) -> Result<(), ModelError> {
        if self.predecessor.is_some() {
            return Err(ModelError::DuplicateLaneLink {
                lane_id: self.id,
                kind: "predecessor",
            });
        }
        self.predecessor = Some(lane_id);
        Ok(())
    }

    /// Setzt den Nachfolger; ein zweiter Nachfolger ist ein Fehler
    pub fn set_successor(&mut self, lane_id: i32) -> Result<(), ModelError> {
        if self.successor.is_some() {
            return Err(ModelError::DuplicateLaneLink {
                lane_id: self.id,
                kind: "successor",
            });
        }
        self.successor = Some(lane_id);
        Ok(())
    }

    /// Fügt eine Markierung hinzu und begrenzt alle vorherigen auf deren Start.
    pub fn add_road_mark(&mut self, road_mark: RoadMark) {
        for previous in &mut self.road_marks {
            if previous.s_end > road_mark.s_offset {
                previous.s_end = road_mark.s_offset;
            }
        }
        self.road_marks.push(road_mark);
    }

    pub fn road_marks(&self) -> &[RoadMark] {
        &self.road_marks
    }

    /// Markierung an der lokalen Position `ds`
    pub fn road_mark_at(&self, ds: f64) -> Option<&RoadMark> {
        self.road_marks.iter().find(|mark| mark.covers(ds))
    }
}

/// Längsabschnitt einer Straße mit festem Querschnitt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSection {
    /// Start-Position auf der Straße
    pub start: f64,
    lanes: BTreeMap<i32, Lane>,
}

impl LaneSection {
    pub fn new(start: f64) -> Self {
        Self {
            start,
            lanes: BTreeMap::new(),
        }
    }

    /// Fügt eine Lane hinzu; die ID muss in der Section eindeutig sein
    pub fn add_lane(&mut self, lane: Lane) -> Result<&mut Lane, ModelError> {
        let id = lane.id;
        if self.lanes.contains_key(&id) {
            return Err(ModelError::DuplicateLaneId(id));
        }
        Ok(self.lanes.entry(id).or_insert(lane))
    }

    pub fn lane(&self, id: i32) -> Option<&Lane> {
        self.lanes.get(&id)
    }

    pub fn lane_mut(&mut self, id: i32) -> Option<&mut Lane> {
        self.lanes.get_mut(&id)
    }

    /// Alle Lanes aufsteigend nach ID (rechts → Mitte → links)
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.values()
    }

    pub fn lanes_mut(&mut self) -> impl Iterator<Item = &mut Lane> {
        self.lanes.values_mut()
    }

    pub fn lane_ids(&self) -> Vec<i32> {
        self.lanes.keys().copied().collect()
    }

    /// Anzahl der Lanes ohne Mittellane
    pub fn physical_lane_count(&self) -> usize {
        self.lanes.keys().filter(|id| **id != 0).count()
    }

    /// Prüft, dass die IDs von der Mitte aus lückenlos sind (1..N, -1..-M)
    pub fn validate_lane_ids(&self) -> Result<(), ModelError> {
        let left = self.lanes.keys().filter(|id| **id > 0).count() as i32;
        let right = self.lanes.keys().filter(|id| **id < 0).count() as i32;

        let left_ok = (1..=left).all(|id| self.lanes.contains_key(&id));
        let right_ok = (1..=right).all(|id| self.lanes.contains_key(&-id));
        if left_ok && right_ok {
            Ok(())
        } else {
            Err(ModelError::NonContiguousLaneIds(self.lane_ids()))
        }
    }

    /// Seitlicher Abstand des äußeren Lane-Rands zur Mittellane
    /// (vorzeichenbehaftet, links positiv). `ds` relativ zum Section-Start.
    pub fn outer_border_offset(&self, lane_id: i32, ds: f64) -> Option<f64> {
        if lane_id == 0 {
            return Some(0.0);
        }
        let lane = self.lanes.get(&lane_id)?;
        let sign = f64::from(lane_id.signum());

        if lane.uses_border() {
            return Some(sign * evaluate_records(&lane.borders, ds).abs());
        }

        let inner = self.outer_border_offset(lane_id - lane_id.signum(), ds)?;
        Some(inner + sign * evaluate_records(&lane.widths, ds))
    }

    /// Breite einer Lane an der lokalen Position `ds`.
    ///
    /// Bei Rand-Beschreibung ist die Breite `|Rand| - |innerer Rand|`, wobei
    /// der innere Rand der äußere Rand der nächsten Lane zur Mitte ist.
    pub fn lane_width(&self, lane_id: i32, ds: f64) -> Option<f64> {
        let lane = self.lanes.get(&lane_id)?;
        if lane_id == 0 {
            return Some(0.0);
        }
        if !lane.uses_border() {
            return Some(evaluate_records(&lane.widths, ds));
        }
        let outer = self.outer_border_offset(lane_id, ds)?;
        let inner = self.outer_border_offset(lane_id - lane_id.signum(), ds)?;
        Some(outer.abs() - inner.abs())
    }

    /// Seitlicher Abstand der Lane-Mitte zur Mittellane
    pub fn lane_center_offset(&self, lane_id: i32, ds: f64) -> Option<f64> {
        if lane_id == 0 {
            return Some(0.0);
        }
        let outer = self.outer_border_offset(lane_id, ds)?;
        let inner = self.outer_border_offset(lane_id - lane_id.signum(), ds)?;
        Some(0.5 * (inner + outer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn section_with_widths() -> LaneSection {
        let mut section = LaneSection::new(0.0);
        section.add_lane(Lane::new(0, LaneType::None)).unwrap();
        for (id, width) in [(1, 3.0), (2, 2.5), (-1, 3.5)] {
            let lane = section.add_lane(Lane::new(id, LaneType::Driving)).unwrap();
            lane.add_width(0.0, width, 0.0, 0.0, 0.0).unwrap();
        }
        section
    }

    #[test]
    fn test_duplicate_lane_id_is_rejected() {
        let mut section = LaneSection::new(0.0);
        section.add_lane(Lane::new(-1, LaneType::Driving)).unwrap();
        assert_eq!(
            section.add_lane(Lane::new(-1, LaneType::Shoulder)).unwrap_err(),
            ModelError::DuplicateLaneId(-1)
        );
    }

    #[test]
    fn test_contiguous_lane_ids() {
        let section = section_with_widths();
        assert!(section.validate_lane_ids().is_ok());

        let mut gap = LaneSection::new(0.0);
        gap.add_lane(Lane::new(1, LaneType::Driving)).unwrap();
        gap.add_lane(Lane::new(3, LaneType::Driving)).unwrap();
        assert!(matches!(
            gap.validate_lane_ids(),
            Err(ModelError::NonContiguousLaneIds(_))
        ));
    }

    #[test]
    fn test_offsets_from_widths() {
        let section = section_with_widths();
        assert_relative_eq!(section.outer_border_offset(2, 10.0).unwrap(), 5.5);
        assert_relative_eq!(section.outer_border_offset(-1, 10.0).unwrap(), -3.5);
        assert_relative_eq!(section.lane_center_offset(2, 0.0).unwrap(), 4.25);
        assert_relative_eq!(section.lane_width(1, 3.0).unwrap(), 3.0);
    }

    #[test]
    fn test_width_from_border_records() {
        let mut section = LaneSection::new(0.0);
        let inner = section.add_lane(Lane::new(-1, LaneType::Driving)).unwrap();
        inner.add_border(0.0, 3.0, 0.0, 0.0, 0.0).unwrap();
        let outer = section.add_lane(Lane::new(-2, LaneType::Shoulder)).unwrap();
        outer.add_border(0.0, 4.0, 0.1, 0.0, 0.0).unwrap();

        assert_relative_eq!(section.lane_width(-1, 5.0).unwrap(), 3.0);
        assert_relative_eq!(section.lane_width(-2, 5.0).unwrap(), 1.5);
    }

    #[test]
    fn test_center_lane_has_no_geometry() {
        let mut lane = Lane::new(0, LaneType::None);
        assert_eq!(
            lane.add_width(0.0, 1.0, 0.0, 0.0, 0.0),
            Err(ModelError::CenterLaneGeometry)
        );
    }

    #[test]
    fn test_second_lane_link_is_rejected() {
        let mut lane = Lane::new(-1, LaneType::Driving);
        lane.set_successor(-1).unwrap();
        assert!(lane.set_successor(-2).is_err());
        lane.set_predecessor(-2).unwrap();
        assert_eq!(lane.predecessor(), Some(-2));
        assert_eq!(lane.successor(), Some(-1));
    }

    #[test]
    fn test_road_marks_are_chained() {
        let mut lane = Lane::new(1, LaneType::Driving);
        lane.add_road_mark(RoadMark::new(0.0, LaneSide::Left));
        lane.add_road_mark(RoadMark {
            mark_type: RoadMarkType::Broken,
            ..RoadMark::new(20.0, LaneSide::Left)
        });

        assert_eq!(lane.road_marks()[0].s_end, 20.0);
        assert_eq!(lane.road_marks()[1].s_end, f64::INFINITY);
        assert_eq!(
            lane.road_mark_at(25.0).map(|mark| mark.mark_type),
            Some(RoadMarkType::Broken)
        );
        assert_eq!(
            lane.road_mark_at(5.0).map(|mark| mark.mark_type),
            Some(RoadMarkType::None)
        );
    }
}
