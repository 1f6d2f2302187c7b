//! Integration tests for the fightsim binary
//!
//! Runs each subcommand end to end against temporary JSON inputs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn fighter_json(id: u64, name: &str, rating: u8, style: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "attributes": {
            "striking": rating,
            "grappling": rating,
            "wrestling": rating,
            "cardio": rating,
            "chin": rating,
            "speed": rating
        },
        "style": style,
        "traits": ["iron_chin"],
        "cut": "moderate"
    })
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn fightsim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fightsim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn fight_args<'a>(red: &'a Path, blue: &'a Path, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["fight", "--red", path_str(red), "--blue", path_str(blue)];
    args.extend_from_slice(extra);
    args
}

fn two_fighters(dir: &TempDir) -> (PathBuf, PathBuf) {
    let red = fighter_json(1, "Red", 72, "Striker");
    let blue = fighter_json(2, "Blue", 68, "Well-Rounded");
    (
        write_json(dir, "red.json", &red),
        write_json(dir, "blue.json", &blue),
    )
}

// ============================================================================
// FIGHT
// ============================================================================

#[test]
fn test_fight_json_output() {
    let dir = TempDir::new().unwrap();
    let (red, blue) = two_fighters(&dir);

    let out = fightsim(&fight_args(&red, &blue, &["--seed", "7", "--json"]));
    let v = stdout_json(&out);

    assert_eq!(v["red_name"], "Red");
    assert_eq!(v["red_id"], 1);
    assert_eq!(v["scheduled_rounds"], 3);
    assert!(v["events"].as_array().unwrap().is_empty());
    let round = v["round"].as_u64().unwrap();
    assert!((1..=3).contains(&round));
}

#[test]
fn test_fight_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let (red, blue) = two_fighters(&dir);
    let args = fight_args(&red, &blue, &["--seed", "99", "--json", "--events"]);

    let first = stdout_json(&fightsim(&args));
    let second = stdout_json(&fightsim(&args));
    assert_eq!(first, second);
    assert!(!first["events"].as_array().unwrap().is_empty());
}

#[test]
fn test_fight_title_rounds() {
    let dir = TempDir::new().unwrap();
    let (red, blue) = two_fighters(&dir);
    let out = fightsim(&fight_args(&red, &blue, &["--title", "--json"]));
    assert_eq!(stdout_json(&out)["scheduled_rounds"], 5);
}

#[test]
fn test_fight_rejects_invalid_fighter() {
    let dir = TempDir::new().unwrap();
    let (red, _) = two_fighters(&dir);
    let bad = write_json(&dir, "bad.json", &fighter_json(2, "Bad", 0, "Striker"));

    let out = fightsim(&fight_args(&red, &bad, &[]));
    assert!(!out.status.success());
}

#[test]
fn test_fight_missing_file() {
    let missing = Path::new("/nonexistent/a.json");
    let out = fightsim(&fight_args(missing, missing, &[]));
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to read fighter"));
}

#[test]
fn test_fight_with_tuning_file() {
    let dir = TempDir::new().unwrap();
    let (red, blue) = two_fighters(&dir);
    let tuning = write_json(&dir, "tuning.json", &json!({"momentum_mode": "saturating"}));

    let extra = ["--tuning", path_str(&tuning), "--json"];
    let out = fightsim(&fight_args(&red, &blue, &extra));
    stdout_json(&out);

    let bad = write_json(&dir, "bad_tuning.json", &json!({"ground_stay": 3.0}));
    let out = fightsim(&fight_args(&red, &blue, &["--tuning", path_str(&bad)]));
    assert!(!out.status.success());
}

// ============================================================================
// BATCH COMMANDS
// ============================================================================

#[test]
fn test_calibrate_json() {
    let out = fightsim(&["calibrate", "--fights", "200", "--json"]);
    let v = stdout_json(&out);
    assert_eq!(v["fights"], 200);
    assert_eq!(v["classes"].as_array().unwrap().len(), 3);
    let share: f64 = v["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["share"].as_f64().unwrap())
        .sum();
    assert!((share - 1.0).abs() < 1e-9);
}

#[test]
fn test_card_json() {
    let dir = TempDir::new().unwrap();
    let card = json!({
        "name": "Fight Night 1",
        "bouts": [
            {
                "red": fighter_json(1, "A", 60, "Wrestler"),
                "blue": fighter_json(2, "B", 62, "Grappler")
            },
            {
                "red": fighter_json(3, "C", 80, "Striker"),
                "blue": fighter_json(4, "D", 78, "Striker"),
                "title": true
            }
        ]
    });
    let path = write_json(&dir, "card.json", &card);

    let v = stdout_json(&fightsim(&["card", "--card", path_str(&path), "--json"]));
    assert_eq!(v["name"], "Fight Night 1");
    let bouts = v["bouts"].as_array().unwrap();
    assert_eq!(bouts.len(), 2);
    assert_eq!(bouts[1]["title"], true);
}

#[test]
fn test_series_json() {
    let dir = TempDir::new().unwrap();
    let (red, blue) = two_fighters(&dir);
    let args = [
        "series",
        "--first",
        path_str(&red),
        "--second",
        path_str(&blue),
        "--fights",
        "20",
        "--json",
    ];
    let v = stdout_json(&fightsim(&args));
    assert_eq!(v["fights"], 20);
    let total = v["first_wins"].as_u64().unwrap()
        + v["second_wins"].as_u64().unwrap()
        + v["draws"].as_u64().unwrap();
    assert_eq!(total, 20);
}

#[test]
fn test_text_output() {
    let dir = TempDir::new().unwrap();
    let (red, blue) = two_fighters(&dir);
    let out = fightsim(&fight_args(&red, &blue, &[]));
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("=== Fight Result ==="));
    assert!(text.contains("Knockdowns:"));
}
