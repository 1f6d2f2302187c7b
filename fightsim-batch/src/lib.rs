//! FightSim Batch - many-fight execution
//!
//! This crate runs the engine over many bouts:
//! - Calibration runs over a sampled realistic roster
//! - Head-to-head series with corner alternation
//! - Event cards of independent bouts
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: callers (CLI, tests)
//! - Level 2: run_calibration, run_series, simulate_card (phases)
//! - Level 3: sample_fighter, per-fight execution (steps)
//! - Level 4: utilities, configuration, distributions

mod calibration;
mod card;
mod config;
mod report;
mod roster;
mod series;

pub use calibration::{
    run_calibration, run_calibration_with, trait_ko_loss_rate, CalibrationReport,
    TraitComparison,
};
pub use card::{simulate_card, CardBout, CardResult, EventCard};
pub use config::{CalibrationConfig, SeriesConfig, DEFAULT_TITLE_RATE};
pub use report::{BandViolation, MethodClass, MethodDistribution, Tolerance};
pub use roster::{sample_fighter, sample_traits, ATTRIBUTE_RANGE, MAX_TRAITS};
pub use series::{run_series, SeriesResult};
