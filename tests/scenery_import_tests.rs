/// Integration-Tests für den Szenerie-Import
use approx::assert_relative_eq;
use road_scenery::core::{LaneType, RoadElementValidity, RoadSignalUnit, RoadTypeInformation};
use road_scenery::xml::Severity;
use road_scenery::{parse_scenery, ImportOptions, Scenery, SceneryImporter, SimulatorLimits};

const CHAIN: &str = include_str!("fixtures/chain.xodr");
const JUNCTION: &str = include_str!("fixtures/junction.xodr");

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_import_chain_fixture() {
    let report = parse_scenery(CHAIN).unwrap();
    let scenery = &report.scenery;

    assert_eq!(scenery.road_count(), 3);
    assert_eq!(scenery.junction_count(), 0);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let road = scenery.road("2").unwrap();
    assert_eq!(road.length(), 100.0);
    assert_eq!(road.lane_sections().len(), 2);
    assert_eq!(road.section_end(0), Some(50.0));
    assert_relative_eq!(road.lane_width(-2, 20.0).unwrap(), 2.1, epsilon = 1e-9);
    assert_eq!(road.lane_width(-2, 70.0), None);
    assert_eq!(road.signals().len(), 3);
    assert_eq!(road.signals()[0].unit, RoadSignalUnit::KilometersPerHour);
    assert_eq!(road.signals()[2].validity, RoadElementValidity::Lanes(-2..=-2));

    let first = scenery.road("1").unwrap();
    assert_relative_eq!(first.elevation(50.0), 10.5, epsilon = 1e-9);
    assert_eq!(first.road_type_at(80.0), Some(RoadTypeInformation::Town));
    assert_eq!(first.objects().len(), 1);
    assert_eq!(first.objects()[0].width, 1.0);

    let last = scenery.road("3").unwrap();
    assert_eq!(
        last.lane_sections()[0].lane(-2).map(|lane| lane.lane_type),
        Some(LaneType::Sidewalk)
    );
}

#[test]
fn test_chain_summary() {
    let summary = parse_scenery(CHAIN).unwrap().summary();

    assert_eq!(summary.roads, 3);
    assert_eq!(summary.lane_sections, 4);
    assert_eq!(summary.lanes, 11);
    assert_eq!(summary.objects, 1);
    assert_eq!(summary.signals, 4);
    assert_eq!(summary.total_length, 300.0);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["roads"], 3);
    assert_eq!(json["warnings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_import_junction_fixture() {
    let report = parse_scenery(JUNCTION).unwrap();
    let scenery = &report.scenery;

    let junction = scenery.junction("J").unwrap();
    assert_eq!(junction.connection_count(), 2);
    assert_eq!(junction.connection("b").unwrap().connecting_road(), "c2");
    assert!(scenery.road("c1").unwrap().is_in_junction());
    assert!(!scenery.road("in").unwrap().is_in_junction());

    // hdg wird auf 6 Nachkommastellen gerundet
    assert_eq!(scenery.road("c2").unwrap().geometries()[0].hdg, 1.570796);
}

#[test]
fn test_import_from_file() {
    let mut scenery = Scenery::new();
    let importer = SceneryImporter::default();

    assert!(importer.import(fixture_path("chain.xodr"), &mut scenery));
    assert_eq!(scenery.road_count(), 3);
}

#[test]
fn test_failed_import_keeps_scenery() {
    let importer = SceneryImporter::default();
    let mut scenery = Scenery::new();
    assert!(importer.import(fixture_path("junction.xodr"), &mut scenery));

    assert!(!importer.import(fixture_path("missing.xodr"), &mut scenery));
    assert_eq!(scenery.road_count(), 4);
    assert!(scenery.junction("J").is_some());

    let err = importer.import_file(fixture_path("missing.xodr")).unwrap_err();
    assert_eq!(err.severity, Severity::Fatal);
    assert!(err.message.contains("missing.xodr"));
}

#[test]
fn test_numbers_are_locale_independent() {
    let report = parse_scenery(CHAIN).unwrap();
    assert_eq!(report.scenery.road("2").unwrap().geometries()[0].x, 100.0);

    let point = CHAIN.replacen(r#"x="100""#, r#"x="1.5""#, 1);
    let report = parse_scenery(&point).unwrap();
    assert_eq!(report.scenery.road("2").unwrap().geometries()[0].x, 1.5);

    let comma = CHAIN.replacen(r#"x="100""#, r#"x="1,5""#, 1);
    let err = parse_scenery(&comma).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.element, "geometry");
}

#[test]
fn test_duplicate_ids_are_fatal() {
    let duplicate_road = CHAIN.replacen(r#"id="3""#, r#"id="2""#, 1);
    assert!(parse_scenery(&duplicate_road).is_err());

    let duplicate_connection = JUNCTION.replacen(r#"id="b""#, r#"id="a""#, 1);
    let err = parse_scenery(&duplicate_connection).unwrap_err();
    assert_eq!(err.element, "connection");
}

#[test]
fn test_rounding_is_idempotent() {
    let options = ImportOptions::default();
    for value in [1.23456, -2.0006, 100.0, 0.0004, 12345.6789] {
        let once = options.round_position(value);
        assert_eq!(options.round_position(once), once);
    }
    for value in [1.5707963267948966, -3.14159265, 0.1234564] {
        let once = options.round_heading(value);
        assert_eq!(options.round_heading(once), once);
    }
}

#[test]
fn test_simulator_limits_drop_objects() {
    let importer = SceneryImporter::new(ImportOptions {
        simulator_limits: SimulatorLimits {
            max_object_height: 5.0,
            ..Default::default()
        },
        ..Default::default()
    });
    let report = importer.parse_str(CHAIN).unwrap();

    assert!(report.scenery.road("1").unwrap().objects().is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].severity, Severity::Recoverable);
    assert_eq!(report.warnings[0].element, "object");
}

#[test]
fn test_truncated_document_is_fatal() {
    let truncated = &CHAIN[..CHAIN.len() / 2];
    assert!(parse_scenery(truncated).unwrap_err().is_fatal());
}
