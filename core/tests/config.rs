//! Fleet configuration loading and validation.

use gridfleet_core::{
    config::FleetConfig,
    error::FleetError,
    fleet::FleetGenerator,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("gridfleet-{}-{name}", std::process::id()))
}

#[test]
fn round_trips_through_a_json_file() {
    let config = FleetConfig::default_test().with_seed(7);
    let path = temp_path("roundtrip.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = FleetConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded, config);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_reports_missing_files() {
    let err = FleetConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "{err}");
}

#[test]
fn load_rejects_invalid_regions() {
    let mut config = FleetConfig::default_test();
    config.regions[1].tag_prefix = config.regions[0].tag_prefix.clone();
    let path = temp_path("dup.json");
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    assert!(FleetConfig::load(path.to_str().unwrap()).is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn validation_catches_each_problem() {
    let invalid = |c: &FleetConfig| matches!(c.validate(), Err(FleetError::InvalidConfig { .. }));

    let mut c = FleetConfig::default();
    c.regions.clear();
    assert!(invalid(&c), "empty region list");

    let mut c = FleetConfig::default();
    c.regions[0].centers.clear();
    assert!(invalid(&c), "region without centers");

    let mut c = FleetConfig::default();
    c.regions[2].bbox.lat_min = c.regions[2].bbox.lat_max;
    assert!(invalid(&c), "degenerate bounding box");

    let mut c = FleetConfig::default();
    c.regions[0].centers[0].radius = 0.0;
    assert!(invalid(&c), "zero radius");

    let mut c = FleetConfig::default();
    c.regions[3].centers[0].lat = 45.0;
    assert!(invalid(&c), "center outside its box");
}

#[test]
fn unknown_and_malformed_tags_are_errors() {
    let g = FleetGenerator::new(FleetConfig::default());
    assert!(matches!(g.asset("DUKE-0001"), Err(FleetError::UnknownRegion { .. })));
    assert!(matches!(g.asset("COMED"), Err(FleetError::MalformedTag { .. })));
}
