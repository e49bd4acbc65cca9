//! Geschlossene Aufzählungen des Straßenmodells und ihre XML-Schreibweisen.
//!
//! Jede Aufzählung übersetzt ihren XML-Attributwert über `from_xml_str`.
//! `None` bedeutet: der Wert ist nicht in der Tabelle. Ob das ein Fehler ist
//! oder ein Default greift, entscheidet der Importer.

use serde::Serialize;

/// Typ einer Lane (`<lane type="...">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LaneType {
    #[default]
    Undefined,
    Shoulder,
    Border,
    Driving,
    Stop,
    None,
    Restricted,
    Parking,
    Median,
    Biking,
    Sidewalk,
    Curb,
    Exit,
    Entry,
    OnRamp,
    OffRamp,
    ConnectingRamp,
    Tram,
    RoadWorks,
    Bidirectional,
}

impl LaneType {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let lane_type = match value {
            "shoulder" => Self::Shoulder,
            "border" => Self::Border,
            "driving" => Self::Driving,
            "stop" => Self::Stop,
            "none" => Self::None,
            "restricted" => Self::Restricted,
            "parking" => Self::Parking,
            "median" => Self::Median,
            "biking" => Self::Biking,
            "sidewalk" => Self::Sidewalk,
            "curb" => Self::Curb,
            "exit" => Self::Exit,
            "entry" => Self::Entry,
            "onRamp" => Self::OnRamp,
            "offRamp" => Self::OffRamp,
            "connectingRamp" => Self::ConnectingRamp,
            "tram" => Self::Tram,
            "roadWorks" => Self::RoadWorks,
            "bidirectional" => Self::Bidirectional,
            _ => return None,
        };
        Some(lane_type)
    }

    /// Fahrbare Lane für den Fahrzeugverkehr
    pub fn is_drivable(&self) -> bool {
        matches!(
            self,
            Self::Driving
                | Self::Exit
                | Self::Entry
                | Self::OnRamp
                | Self::OffRamp
                | Self::ConnectingRamp
                | Self::Bidirectional
        )
    }
}

/// Typ einer Fahrbahnmarkierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadMarkType {
    #[default]
    Undefined,
    None,
    Solid,
    Broken,
    SolidSolid,
    SolidBroken,
    BrokenSolid,
    BrokenBroken,
    BottsDots,
    Grass,
    Curb,
}

impl RoadMarkType {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let mark_type = match value {
            "none" => Self::None,
            "solid" => Self::Solid,
            "broken" => Self::Broken,
            "solid solid" => Self::SolidSolid,
            "solid broken" => Self::SolidBroken,
            "broken solid" => Self::BrokenSolid,
            "broken broken" => Self::BrokenBroken,
            "botts dots" => Self::BottsDots,
            "grass" => Self::Grass,
            "curb" => Self::Curb,
            _ => return None,
        };
        Some(mark_type)
    }
}

/// Farbe einer Fahrbahnmarkierung (`standard` entspricht Weiß).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadMarkColor {
    #[default]
    Undefined,
    Blue,
    Green,
    Red,
    Yellow,
    White,
    Orange,
}

impl RoadMarkColor {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let color = match value {
            "standard" | "white" => Self::White,
            "blue" => Self::Blue,
            "green" => Self::Green,
            "red" => Self::Red,
            "yellow" => Self::Yellow,
            "orange" => Self::Orange,
            _ => return None,
        };
        Some(color)
    }
}

/// Strichstärke einer Fahrbahnmarkierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadMarkWeight {
    #[default]
    Undefined,
    Standard,
    Bold,
}

impl RoadMarkWeight {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(Self::Standard),
            "bold" => Some(Self::Bold),
            _ => None,
        }
    }
}

/// Erlaubter Spurwechsel über eine Markierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LaneChange {
    #[default]
    Undefined,
    None,
    Both,
    Increase,
    Decrease,
}

impl LaneChange {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let lane_change = match value {
            "none" => Self::None,
            "both" => Self::Both,
            "increase" => Self::Increase,
            "decrease" => Self::Decrease,
            _ => return None,
        };
        Some(lane_change)
    }
}

/// Seite, auf der eine Lane bzw. Markierung liegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LaneSide {
    Left,
    Center,
    Right,
}

impl LaneSide {
    /// Seite aus der vorzeichenbehafteten Lane-ID
    pub fn of_lane(lane_id: i32) -> Self {
        match lane_id.signum() {
            1 => Self::Left,
            -1 => Self::Right,
            _ => Self::Center,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Straßentyp einer Zone (`<type s="..." type="...">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadTypeInformation {
    #[default]
    Undefined,
    Unknown,
    Rural,
    Motorway,
    Town,
    LowSpeed,
    Pedestrian,
    Bicycle,
}

impl RoadTypeInformation {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let road_type = match value {
            "unknown" => Self::Unknown,
            "rural" => Self::Rural,
            "town" => Self::Town,
            "motorway" => Self::Motorway,
            "lowSpeed" => Self::LowSpeed,
            "pedestrian" => Self::Pedestrian,
            "bicycle" => Self::Bicycle,
            _ => return None,
        };
        Some(road_type)
    }
}

/// Art des verlinkten Elements eines Straßen-Links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoadLinkElementType {
    Road,
    Junction,
}

impl RoadLinkElementType {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        match value {
            "road" => Some(Self::Road),
            "junction" => Some(Self::Junction),
            _ => None,
        }
    }
}

/// Richtung eines Straßen- oder Lane-Links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinkKind {
    Predecessor,
    Successor,
}

impl LinkKind {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        match value {
            "predecessor" => Some(Self::Predecessor),
            "successor" => Some(Self::Successor),
            _ => None,
        }
    }
}

/// Anschlusspunkt an der verlinkten Straße.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ContactPoint {
    #[default]
    Undefined,
    Start,
    End,
}

impl ContactPoint {
    /// Nur `start` und `end` sind gültig
    pub fn from_xml_str(value: &str) -> Option<Self> {
        match value {
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}

/// Ausrichtung eines Objekts oder Signals relativ zur Referenzlinie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadElementOrientation {
    Both,
    #[default]
    Positive,
    Negative,
}

impl RoadElementOrientation {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::Both),
            "+" => Some(Self::Positive),
            "-" => Some(Self::Negative),
            _ => None,
        }
    }

    /// Wirkt das Element in Richtung (`true`) bzw. entgegen (`false`) der Referenzlinie?
    pub fn applies_to(&self, along_reference_line: bool) -> bool {
        match self {
            Self::Both => true,
            Self::Positive => along_reference_line,
            Self::Negative => !along_reference_line,
        }
    }
}

/// Einheit eines Signalwerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadSignalUnit {
    #[default]
    Undefined,
    Meter,
    Kilometer,
    Feet,
    LandMile,
    MetersPerSecond,
    MilesPerHour,
    KilometersPerHour,
    Kilogram,
    MetricTons,
    Percent,
}

impl RoadSignalUnit {
    /// Leerer String ist der gültige Zustand `Undefined`
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let unit = match value {
            "" => Self::Undefined,
            "m" => Self::Meter,
            "km" => Self::Kilometer,
            "ft" => Self::Feet,
            "mile" => Self::LandMile,
            "m/s" => Self::MetersPerSecond,
            "km/h" => Self::KilometersPerHour,
            "mph" => Self::MilesPerHour,
            "kg" => Self::Kilogram,
            "t" => Self::MetricTons,
            "%" => Self::Percent,
            _ => return None,
        };
        Some(unit)
    }
}

/// Typ eines Straßenobjekts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoadObjectType {
    #[default]
    None,
    Obstacle,
    Car,
    Pole,
    Tree,
    Vegetation,
    Barrier,
    Building,
    ParkingSpace,
    Patch,
    Railing,
    TrafficIsland,
    Crosswalk,
    Streetlamp,
    Gantry,
    SoundBarrier,
    Van,
    Bus,
    Trailer,
    Bike,
    Motorbike,
    Tram,
    Train,
    Pedestrian,
    Wind,
    RoadMark,
}

impl RoadObjectType {
    pub fn from_xml_str(value: &str) -> Option<Self> {
        let object_type = match value {
            "none" => Self::None,
            "obstacle" => Self::Obstacle,
            "car" => Self::Car,
            "pole" => Self::Pole,
            "tree" => Self::Tree,
            "vegetation" => Self::Vegetation,
            "barrier" => Self::Barrier,
            "building" => Self::Building,
            "parkingSpace" => Self::ParkingSpace,
            "patch" => Self::Patch,
            "railing" => Self::Railing,
            "trafficIsland" => Self::TrafficIsland,
            "crosswalk" => Self::Crosswalk,
            "streetlamp" => Self::Streetlamp,
            "gantry" => Self::Gantry,
            "soundBarrier" => Self::SoundBarrier,
            "van" => Self::Van,
            "bus" => Self::Bus,
            "trailer" => Self::Trailer,
            "bike" => Self::Bike,
            "motorbike" => Self::Motorbike,
            "tram" => Self::Tram,
            "train" => Self::Train,
            "pedestrian" => Self::Pedestrian,
            "wind" => Self::Wind,
            "roadMark" => Self::RoadMark,
            _ => return None,
        };
        Some(object_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_type_table_is_closed() {
        assert_eq!(LaneType::from_xml_str("driving"), Some(LaneType::Driving));
        assert_eq!(LaneType::from_xml_str("onRamp"), Some(LaneType::OnRamp));
        assert_eq!(LaneType::from_xml_str("Driving"), None);
        assert_eq!(LaneType::from_xml_str("highway"), None);
    }

    #[test]
    fn test_road_mark_defaults_map_to_documented_values() {
        assert_eq!(RoadMarkType::from_xml_str("none"), Some(RoadMarkType::None));
        assert_eq!(
            RoadMarkType::from_xml_str("solid broken"),
            Some(RoadMarkType::SolidBroken)
        );
        assert_eq!(
            RoadMarkColor::from_xml_str("standard"),
            Some(RoadMarkColor::White)
        );
        assert_eq!(
            RoadMarkWeight::from_xml_str("standard"),
            Some(RoadMarkWeight::Standard)
        );
    }

    #[test]
    fn test_signal_unit_empty_is_undefined() {
        assert_eq!(
            RoadSignalUnit::from_xml_str(""),
            Some(RoadSignalUnit::Undefined)
        );
        assert_eq!(
            RoadSignalUnit::from_xml_str("km/h"),
            Some(RoadSignalUnit::KilometersPerHour)
        );
        assert_eq!(RoadSignalUnit::from_xml_str("lightyear"), None);
    }

    #[test]
    fn test_orientation_applies_to_direction() {
        assert!(RoadElementOrientation::Both.applies_to(false));
        assert!(RoadElementOrientation::Positive.applies_to(true));
        assert!(!RoadElementOrientation::Positive.applies_to(false));
        assert!(RoadElementOrientation::Negative.applies_to(false));
    }

    #[test]
    fn test_lane_side_from_id() {
        assert_eq!(LaneSide::of_lane(2), LaneSide::Left);
        assert_eq!(LaneSide::of_lane(0), LaneSide::Center);
        assert_eq!(LaneSide::of_lane(-1), LaneSide::Right);
    }
}
