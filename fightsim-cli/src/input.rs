//! JSON input files shared by the commands
//!
//! Level 4 - Utilities

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use fightsim_core::{EngineTuning, FighterState};

/// Read and parse one JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {what}: {}", path.display()))
}

pub fn load_fighter(path: &Path) -> Result<FighterState> {
    load_json(path, "fighter")
}

/// Engine tuning from `--tuning`, or the calibrated defaults
pub fn load_tuning(path: Option<&Path>) -> Result<EngineTuning> {
    let tuning = match path {
        Some(p) => load_json::<EngineTuning>(p, "tuning")?,
        None => return Ok(EngineTuning::default()),
    };
    tuning.validate().context("Invalid tuning file")?;
    Ok(tuning)
}

/// Percentage with one decimal, 0 for an empty total
pub fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
