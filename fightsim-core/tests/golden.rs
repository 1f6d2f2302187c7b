//! Golden fixture: two identical 70-rated fighters, seed 42, three rounds.
//!
//! The fixture is committed and must be reproduced on every run. After an
//! intentional model change, re-record it with `FIGHTSIM_RECORD_GOLDEN=1`.
//! A missing fixture fails unless recording is requested.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use fightsim_core::{simulate, Attributes, FightConfig, FightResult, FighterState, Style};

const RECORD_VAR: &str = "FIGHTSIM_RECORD_GOLDEN";
/// Fixture floats are decimal renderings; allow for the last-digit rounding
const FLOAT_TOLERANCE: f64 = 1e-9;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("golden_70v70_seed42.json")
}

fn golden_fight() -> FightResult {
    let red = FighterState::new(1, "Red", Attributes::uniform(70), Style::WellRounded);
    let blue = FighterState::new(2, "Blue", Attributes::uniform(70), Style::WellRounded);
    simulate(&red, &blue, &FightConfig::new(42)).unwrap()
}

fn recording() -> bool {
    matches!(env::var(RECORD_VAR), Ok(v) if !v.is_empty() && v != "0")
}

/// First difference between two JSON trees, as a path and both values
fn first_difference(path: &str, expected: &Value, actual: &Value) -> Option<String> {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) if e.is_f64() || a.is_f64() => {
            let (e, a) = (e.as_f64()?, a.as_f64()?);
            let scale = e.abs().max(a.abs()).max(1.0);
            if (e - a).abs() <= FLOAT_TOLERANCE * scale {
                None
            } else {
                Some(format!("{path}: expected {e}, got {a}"))
            }
        }
        (Value::Array(e), Value::Array(a)) => {
            if e.len() != a.len() {
                let counts = format!("expected {} items, got {}", e.len(), a.len());
                return Some(format!("{path}: {counts}"));
            }
            for (i, (e, a)) in e.iter().zip(a).enumerate() {
                let at = format!("{path}[{i}]");
                if let Some(diff) = first_difference(&at, e, a) {
                    return Some(diff);
                }
            }
            None
        }
        (Value::Object(e), Value::Object(a)) => {
            let mut keys: Vec<&String> = e.keys().chain(a.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let at = format!("{path}.{key}");
                let diff = match (e.get(key), a.get(key)) {
                    (Some(e), Some(a)) => first_difference(&at, e, a),
                    (Some(_), None) => Some(format!("{at}: missing from result")),
                    (None, _) => Some(format!("{at}: not in fixture")),
                };
                if diff.is_some() {
                    return diff;
                }
            }
            None
        }
        _ if expected == actual => None,
        _ => Some(format!("{path}: expected {expected}, got {actual}")),
    }
}

#[test]
fn test_golden_fixture_stable() {
    let result = golden_fight();
    let path = fixture_path();

    if recording() {
        let rendered = serde_json::to_string_pretty(&result).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("{rendered}\n")).unwrap();
        return;
    }

    let recorded = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "golden fixture {} unreadable ({e}); set {RECORD_VAR}=1 to record it",
            path.display()
        )
    });
    let expected: Value = serde_json::from_str(&recorded).unwrap();
    let actual = serde_json::to_value(&result).unwrap();
    if let Some(diff) = first_difference("$", &expected, &actual) {
        panic!("golden fight changed at {diff}; set {RECORD_VAR}=1 to re-record");
    }

    let parsed: FightResult = serde_json::from_str(&recorded).unwrap();
    assert_eq!(parsed.method, result.method);
    assert_eq!(parsed.winner, result.winner);
    assert_eq!(parsed.events.len(), result.events.len());
}

#[test]
fn test_golden_fight_repeatable_in_process() {
    assert_eq!(golden_fight(), golden_fight());
}

#[test]
fn test_float_drift_is_reported_with_its_path() {
    let expected: Value = serde_json::json!({"red": {"final_stamina": 84.5}, "round": 3});
    let close: Value = serde_json::json!({"red": {"final_stamina": 84.500000000001}, "round": 3});
    assert_eq!(first_difference("$", &expected, &close), None);

    let drifted: Value = serde_json::json!({"red": {"final_stamina": 84.6}, "round": 3});
    let diff = first_difference("$", &expected, &drifted).unwrap();
    assert!(diff.starts_with("$.red.final_stamina"), "{diff}");

    let reshaped: Value = serde_json::json!({"red": {"final_stamina": 84.5}, "round": 2});
    let diff = first_difference("$", &expected, &reshaped).unwrap();
    assert!(diff.starts_with("$.round"), "{diff}");
}
