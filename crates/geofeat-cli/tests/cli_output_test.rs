//! Integration tests for the geofeat binary
//!
//! These tests verify that each subcommand produces the expected text and
//! JSON output, and that global flags reach the codec and planner.

use std::io::Write;
use std::process::{Command, Output};

fn geofeat_bin() -> &'static str {
    env!("CARGO_BIN_EXE_geofeat")
}

fn run(args: &[&str]) -> Output {
    Command::new(geofeat_bin())
        .args(args)
        .env_remove("GEOFEAT_WKT_VALIDITY")
        .env_remove("GEOFEAT_LEGACY_MARKERS")
        .env_remove("GEOFEAT_KM_PER_DEGREE")
        .env_remove("GEOFEAT_AXIS_ORDER")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

#[test]
fn test_decode_json_output() {
    let output = run(&["decode", "POINT(4.9 52.3)", "--properties", r#"{"id": 7}"#, "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = stdout_json(&output);
    assert_eq!(parsed["status"], "success");
    assert_eq!(
        parsed["data"],
        serde_json::json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [4.9, 52.3]},
            "properties": {"id": 7}
        })
    );
}

#[test]
fn test_decode_lat_lng() {
    let output = run(&["decode", "POINT(4.9 52.3)", "--lat-lng", "--json"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data"]["geometry"]["coordinates"], serde_json::json!([52.3, 4.9]));
}

#[test]
fn test_decode_strict_rejects_what_lenient_empties() {
    let wkt = "POLYGON((0 0,1 1,0 0),(oops))";

    let lenient = run(&["decode", wkt, "--json"]);
    assert!(lenient.status.success());
    assert_eq!(
        stdout_json(&lenient)["data"]["geometry"]["coordinates"],
        serde_json::json!([[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]], []])
    );

    let strict = run(&["decode", wkt, "--strict"]);
    assert!(!strict.status.success(), "Strict mode should fail");
}

#[test]
fn test_decode_rejects_non_object_properties() {
    let output = run(&["decode", "POINT(1 2)", "--properties", "[1, 2]"]);
    assert!(!output.status.success());
}

#[test]
fn test_encode_feature() {
    let geojson = r#"{"type":"Feature","geometry":{"type":"LineString","coordinates":[[1,2],[3,4]]},"properties":{}}"#;
    let output = run(&["encode", geojson]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "LINESTRING(1 2,3 4)");
}

#[test]
fn test_encode_from_stdin() {
    let mut child = Command::new(geofeat_bin())
        .args(["encode", "-"])
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"type":"Point","coordinates":[4.9,52.3]}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "POINT(4.9 52.3)");
}

#[test]
fn test_encode_unknown_type_needs_legacy_markers() {
    let circle = r#"{"type":"Circle","coordinates":[1,2]}"#;

    let failed = run(&["encode", circle]);
    assert!(!failed.status.success());

    let legacy = run(&["encode", circle, "--legacy-markers", "--json"]);
    assert!(legacy.status.success());
    assert_eq!(stdout_json(&legacy)["data"], "CIRCLE not implemented");
}

#[test]
fn test_reverse() {
    let output = run(&["reverse", r#"{"type":"Point","coordinates":[4.9,52.3]}"#]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["coordinates"], serde_json::json!([52.3, 4.9]));
}

#[test]
fn test_near_json_plan() {
    let output = run(&["near", "4.9", "52.3", "--radius", "100", "--attribute", "loc", "--json"]);
    assert!(output.status.success());

    let data = &stdout_json(&output)["data"];
    let min = data["plan"]["bounding_box"]["latitude"]["min"].as_f64().unwrap();
    let max = data["plan"]["bounding_box"]["latitude"]["max"].as_f64().unwrap();
    assert!((min - 51.4).abs() < 0.01);
    assert!((max - 53.2).abs() < 0.01);
    assert!(data["distance_sql"].as_str().unwrap().contains("X(loc)"));
    assert!(data.get("matches").is_none());
}

#[test]
fn test_near_negative_longitude() {
    let output = run(&["near", "-0.1276", "51.5072", "-r", "5", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["data"]["plan"]["origin"], serde_json::json!([-0.1276, 51.5072]));
}

#[test]
fn test_near_ranks_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("candidates.geojson");
    std::fs::write(
        &path,
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,0.0]},"properties":{"id":"far"}},
            {"type":"Feature","geometry":{"type":"Point","coordinates":[9.0,9.0]},"properties":{"id":"out"}},
            {"type":"Feature","geometry":{"type":"Point","coordinates":[0.1,0.0]},"properties":{"id":"near"}}
        ]}"#,
    )
    .unwrap();

    let output = run(&[
        "near",
        "0",
        "0",
        "--radius",
        "200",
        "--candidates",
        path.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success());

    let matches = stdout_json(&output)["data"]["matches"].as_array().unwrap().clone();
    let indices: Vec<u64> = matches.iter().map(|m| m["feature_index"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![2, 0]);
    assert_eq!(matches[0]["rank"], 1);
}

#[test]
fn test_near_rejects_missing_candidates_file() {
    let output = run(&["near", "0", "0", "--radius", "1", "--candidates", "/nonexistent/candidates.geojson"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_reports_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geofeat.toml");
    std::fs::write(&path, "legacy_markers = true\n").unwrap();

    let output = Command::new(geofeat_bin())
        .args(["config", "--json", "--strict", "--config", path.to_str().unwrap()])
        .env("GEOFEAT_KM_PER_DEGREE", "111.2")
        .env_remove("GEOFEAT_WKT_VALIDITY")
        .env_remove("GEOFEAT_LEGACY_MARKERS")
        .env_remove("GEOFEAT_AXIS_ORDER")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let rows = stdout_json(&output)["data"].as_array().unwrap().clone();
    let source = |key: &str| {
        rows.iter()
            .find(|row| row["key"] == key)
            .map(|row| row["source"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(source("axis_order"), "Default");
    assert_eq!(source("legacy_markers"), "File");
    assert_eq!(source("km_per_degree"), "Environment");
    assert_eq!(source("wkt_validity"), "Cli");
}
