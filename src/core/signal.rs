//! Verkehrszeichen und Lichtsignalanlagen (`<signal>`).

use serde::Serialize;

use super::object::RoadElementValidity;
use super::types::{RoadElementOrientation, RoadSignalUnit};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadSignalSpecification {
    pub s: f64,
    pub t: f64,
    pub id: String,
    pub name: String,
    /// `yes` / `no`
    pub dynamic: String,
    /// `+`, `-` oder `none`
    pub orientation: String,
    pub z_offset: f64,
    pub country: String,
    pub signal_type: String,
    pub subtype: String,
    pub value: f64,
    pub unit: RoadSignalUnit,
    pub height: f64,
    pub width: f64,
    pub text: String,
    pub h_offset: f64,
    pub pitch: f64,
    pub roll: f64,
    pub validity: RoadElementValidity,
    pub dependency_ids: Vec<String>,
}

impl Default for RoadSignalSpecification {
    fn default() -> Self {
        Self {
            s: 0.0,
            t: 0.0,
            id: String::new(),
            name: String::new(),
            dynamic: "no".to_string(),
            orientation: "+".to_string(),
            z_offset: 0.0,
            country: String::new(),
            signal_type: String::new(),
            subtype: String::new(),
            value: 0.0,
            unit: RoadSignalUnit::Undefined,
            height: 0.0,
            width: 0.0,
            text: String::new(),
            h_offset: 0.0,
            pitch: 0.0,
            roll: 0.0,
            validity: RoadElementValidity::All,
            dependency_ids: Vec::new(),
        }
    }
}

impl RoadSignalSpecification {
    /// Prüft die zulässigen Wertebereiche
    pub fn check_boundaries(&self) -> bool {
        self.s >= 0.0
            && (self.dynamic == "yes" || self.dynamic == "no")
            && self.orientation_value().is_some()
            && self.height >= 0.0
            && self.width >= 0.0
    }

    pub fn orientation_value(&self) -> Option<RoadElementOrientation> {
        RoadElementOrientation::from_xml_str(&self.orientation)
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic == "yes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_boundaries() {
        let signal = RoadSignalSpecification {
            s: 12.0,
            orientation: "none".into(),
            ..Default::default()
        };
        assert!(signal.check_boundaries());
        assert_eq!(
            signal.orientation_value(),
            Some(RoadElementOrientation::Both)
        );

        let invalid_dynamic = RoadSignalSpecification {
            dynamic: "maybe".into(),
            ..signal.clone()
        };
        assert!(!invalid_dynamic.check_boundaries());

        let negative_height = RoadSignalSpecification {
            height: -0.1,
            ..signal
        };
        assert!(!negative_height.check_boundaries());
    }
}
