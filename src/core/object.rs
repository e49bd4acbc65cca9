//! Straßenobjekte, Wiederholungen (`<repeat>`) und Gültigkeitsbereiche.

use std::ops::RangeInclusive;

use serde::Serialize;

use super::types::{RoadElementOrientation, RoadObjectType};
use crate::shared::SimulatorLimits;

/// Lanes, für die ein Objekt oder Signal gilt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum RoadElementValidity {
    /// Kein `<validity>`-Element: gilt für alle Lanes
    #[default]
    All,
    /// Geschlossener Bereich von Lane-IDs, `start <= end`
    Lanes(RangeInclusive<i32>),
}

impl RoadElementValidity {
    /// Bereich `from..=to`; vertauschte Grenzen werden getauscht.
    pub fn from_range(from_lane: i32, to_lane: i32) -> Self {
        Self::Lanes(from_lane.min(to_lane)..=from_lane.max(to_lane))
    }

    pub fn covers(&self, lane_id: i32) -> bool {
        match self {
            Self::All => true,
            Self::Lanes(lanes) => lanes.contains(&lane_id),
        }
    }
}

/// Statisches Objekt an der Straße.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RoadObjectSpecification {
    pub object_type: RoadObjectType,
    pub name: String,
    pub id: String,
    pub s: f64,
    pub t: f64,
    pub z_offset: f64,
    pub valid_length: f64,
    pub orientation: RoadElementOrientation,
    pub width: f64,
    pub length: f64,
    pub radius: f64,
    pub height: f64,
    pub hdg: f64,
    pub pitch: f64,
    pub roll: f64,
    /// Durchgehendes Objekt aus einer Wiederholung mit `distance == 0`
    pub continuous: bool,
    pub validity: RoadElementValidity,
}

impl RoadObjectSpecification {
    /// Wertebereiche laut OpenDRIVE
    pub fn check_standard_compliance(&self) -> bool {
        self.s >= 0.0
            && self.valid_length >= 0.0
            && self.length >= 0.0
            && self.width >= 0.0
            && self.radius >= 0.0
    }

    /// Vom Simulator unterstützte Teilmenge: physische Ausdehnung, kein Radius
    pub fn check_simulator_compliance(&self, limits: &SimulatorLimits) -> bool {
        self.length > 0.0
            && self.width > 0.0
            && self.radius == 0.0
            && self.width <= limits.max_object_width
            && self.length <= limits.max_object_length
            && self.height <= limits.max_object_height
    }

    /// Kreisförmige Objekte werden als Quadrat mit Kantenlänge `2r` angenähert
    pub fn convert_radius(&mut self) {
        if self.radius > 0.0 {
            self.width = 2.0 * self.radius;
            self.length = 2.0 * self.radius;
            self.radius = 0.0;
        }
    }
}

/// Ein über die Wiederholungen linear interpoliertes Attribut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

/// `<repeat>`: vervielfältigt ein Objekt entlang `s`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectRepeat {
    pub s: f64,
    pub length: f64,
    pub distance: f64,
    pub t: Option<Interval>,
    pub width: Option<Interval>,
    pub height: Option<Interval>,
    pub z_offset: Option<Interval>,
}

/// Toleranz bei der Division `length / distance`
const REPEAT_COUNT_EPSILON: f64 = 1e-9;

impl ObjectRepeat {
    pub fn check_limits(&self) -> bool {
        self.s >= 0.0 && self.length >= 0.0 && self.distance >= 0.0
    }

    /// Anzahl der erzeugten Objekte
    pub fn instance_count(&self) -> usize {
        if self.distance == 0.0 {
            1
        } else {
            (self.length / self.distance + REPEAT_COUNT_EPSILON).floor() as usize
        }
    }

    /// Erzeugt die wiederholten Objekte aus der Vorlage.
    ///
    /// Die Compliance-Prüfungen der einzelnen Instanzen übernimmt der Aufrufer.
    pub fn expand(&self, template: &RoadObjectSpecification) -> Vec<RoadObjectSpecification> {
        let continuous = self.distance == 0.0;
        let count = self.instance_count();

        let ts = self.t.map(|i| interpolate_linear(i.start, i.end, count));
        let widths = self.width.map(|i| interpolate_linear(i.start, i.end, count));
        let heights = self.height.map(|i| interpolate_linear(i.start, i.end, count));
        let z_offsets = self.z_offset.map(|i| interpolate_linear(i.start, i.end, count));

        (0..count)
            .map(|i| {
                let mut object = template.clone();
                object.s = self.s + i as f64 * self.distance;
                object.continuous = continuous;
                if continuous {
                    object.length = self.length;
                }
                if let Some(values) = &ts {
                    object.t = values[i];
                }
                if let Some(values) = &widths {
                    object.width = values[i];
                }
                if let Some(values) = &heights {
                    object.height = values[i];
                }
                if let Some(values) = &z_offsets {
                    object.z_offset = values[i];
                }
                object
            })
            .collect()
    }
}

/// `n` gleichabständige Werte von `start` bis `end`; `n == 1` liefert `[start]`.
pub fn interpolate_linear(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn template() -> RoadObjectSpecification {
        RoadObjectSpecification {
            id: "pole".into(),
            width: 0.5,
            length: 0.5,
            height: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_repeat_with_zero_distance_is_continuous() {
        let repeat = ObjectRepeat {
            s: 0.0,
            length: 100.0,
            distance: 0.0,
            ..Default::default()
        };
        let objects = repeat.expand(&template());
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].length, 100.0);
        assert!(objects[0].continuous);
    }

    #[test]
    fn test_repeat_with_distance() {
        let repeat = ObjectRepeat {
            s: 0.0,
            length: 100.0,
            distance: 25.0,
            ..Default::default()
        };
        let objects = repeat.expand(&template());
        let positions: Vec<f64> = objects.iter().map(|o| o.s).collect();
        assert_eq!(positions, vec![0.0, 25.0, 50.0, 75.0]);
        assert!(objects.iter().all(|o| !o.continuous && o.length == 0.5));
    }

    #[test]
    fn test_repeat_interpolates_intervals() {
        let repeat = ObjectRepeat {
            s: 10.0,
            length: 30.0,
            distance: 10.0,
            t: Some(Interval {
                start: -2.0,
                end: 2.0,
            }),
            height: Some(Interval {
                start: 1.0,
                end: 3.0,
            }),
            ..Default::default()
        };
        let objects = repeat.expand(&template());
        assert_eq!(objects.len(), 3);
        assert_relative_eq!(objects[1].t, 0.0);
        assert_relative_eq!(objects[2].height, 3.0);
        assert_relative_eq!(objects[2].s, 30.0);
        assert_relative_eq!(objects[0].width, 0.5);
    }

    #[test]
    fn test_interpolate_single_value_uses_start() {
        assert_eq!(interpolate_linear(4.0, 8.0, 1), vec![4.0]);
        assert_eq!(interpolate_linear(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert!(interpolate_linear(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_radius_conversion_and_compliance() {
        let mut object = RoadObjectSpecification {
            radius: 0.3,
            ..Default::default()
        };
        assert!(object.check_standard_compliance());
        assert!(!object.check_simulator_compliance(&SimulatorLimits::default()));

        object.convert_radius();
        assert_relative_eq!(object.width, 0.6);
        assert_relative_eq!(object.length, 0.6);
        assert!(object.check_simulator_compliance(&SimulatorLimits::default()));

        let narrow = SimulatorLimits {
            max_object_width: 0.5,
            ..Default::default()
        };
        assert!(!object.check_simulator_compliance(&narrow));
    }

    #[test]
    fn test_validity_range_is_normalized() {
        assert_eq!(
            RoadElementValidity::from_range(1, -2),
            RoadElementValidity::Lanes(-2..=1)
        );
        assert!(RoadElementValidity::All.covers(7));
        assert!(!RoadElementValidity::from_range(-3, -2).covers(-1));
    }

    #[test]
    fn test_validity_covers_full_i32_range() {
        let validity = RoadElementValidity::from_range(i32::MIN, i32::MAX);
        assert_eq!(validity, RoadElementValidity::Lanes(i32::MIN..=i32::MAX));
        assert!(validity.covers(i32::MIN));
        assert!(validity.covers(0));
        assert!(validity.covers(i32::MAX));
    }
}
