//! Calibration runs - many fights among sampled fighters
//!
//! Level 2 - Phase-level implementation

use fightsim_core::{simulate, FightConfig, FightError, FightResult, FighterState, Method, Trait};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::CalibrationConfig;
use crate::report::{MethodClass, MethodDistribution, Tolerance};
use crate::roster::sample_fighter;

/// Summary of a calibration run
#[derive(Clone, Debug)]
pub struct CalibrationReport {
    pub distribution: MethodDistribution,
    pub fights: u32,
    /// Fights with no winner (drawn decisions and double knockdowns)
    pub draws: u32,
    /// Average ending round of finishes
    pub avg_finish_round: f32,
    pub title_fights: u32,
}

impl CalibrationReport {
    pub fn class_fraction(&self, class: MethodClass) -> f64 {
        self.distribution.class_fraction(class)
    }

    pub fn within(&self, tolerance: &Tolerance) -> bool {
        tolerance.within_bands(&self.distribution)
    }
}

/// One sampled matchup
#[derive(Clone, Debug)]
struct Bout {
    red: FighterState,
    blue: FighterState,
    config: FightConfig,
}

/// Run a calibration (Level 2 phase)
pub fn run_calibration(config: &CalibrationConfig) -> Result<CalibrationReport, FightError> {
    run_calibration_with(config, || {})
}

/// Run a calibration, calling `on_fight` after every completed fight
pub fn run_calibration_with<F>(
    config: &CalibrationConfig,
    on_fight: F,
) -> Result<CalibrationReport, FightError>
where
    F: Fn() + Sync,
{
    let bouts = prepare_bouts(config);
    let results = if config.parallel {
        execute_parallel(&bouts, &on_fight)?
    } else {
        execute_sequential(&bouts, &on_fight)?
    };
    let report = aggregate(&results);
    tracing::debug!(
        fights = report.fights,
        strike = report.class_fraction(MethodClass::Strike),
        submission = report.class_fraction(MethodClass::Submission),
        decision = report.class_fraction(MethodClass::Decision),
        "calibration complete"
    );
    Ok(report)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Sample every matchup up front from one roster RNG
fn prepare_bouts(config: &CalibrationConfig) -> Vec<Bout> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.base_seed);
    (0..config.fights)
        .map(|i| {
            let red = sample_fighter(&mut rng, 2 * i as u64 + 1);
            let blue = sample_fighter(&mut rng, 2 * i as u64 + 2);
            let title = rng.gen::<f64>() < config.title_rate;
            Bout {
                red,
                blue,
                config: config.fight_config(i, title),
            }
        })
        .collect()
}

fn execute_sequential<F: Fn() + Sync>(
    bouts: &[Bout],
    on_fight: &F,
) -> Result<Vec<FightResult>, FightError> {
    bouts
        .iter()
        .map(|b| {
            let result = simulate(&b.red, &b.blue, &b.config);
            on_fight();
            result
        })
        .collect()
}

fn execute_parallel<F: Fn() + Sync>(
    bouts: &[Bout],
    on_fight: &F,
) -> Result<Vec<FightResult>, FightError> {
    bouts
        .par_iter()
        .map(|b| {
            let result = simulate(&b.red, &b.blue, &b.config);
            on_fight();
            result
        })
        .collect()
}

fn aggregate(results: &[FightResult]) -> CalibrationReport {
    let distribution: MethodDistribution = results.iter().map(|r| r.method).collect();
    let draws = results.iter().filter(|r| r.is_draw()).count() as u32;
    let title_fights = results.iter().filter(|r| r.scheduled_rounds == 5).count() as u32;

    let finishes: Vec<&FightResult> = results.iter().filter(|r| r.is_finish()).collect();
    let avg_finish_round = if finishes.is_empty() {
        0.0
    } else {
        finishes.iter().map(|r| r.round as f32).sum::<f32>() / finishes.len() as f32
    };

    CalibrationReport {
        distribution,
        fights: results.len() as u32,
        draws,
        avg_finish_round,
        title_fights,
    }
}

// ============================================================================
// Trait comparison
// ============================================================================

/// KO/TKO loss rates of a fighter with and without one trait
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraitComparison {
    pub without: f64,
    pub with: f64,
    pub fights: usize,
}

/// Strike-finish loss rate of `subject` against `opponent` with and without `t`.
///
/// Both arms use the same seeds, so the only difference is the trait.
pub fn trait_ko_loss_rate(
    subject: &FighterState,
    opponent: &FighterState,
    t: Trait,
    fights: usize,
    base_seed: u64,
) -> Result<TraitComparison, FightError> {
    let mut plain = subject.clone();
    plain.traits = subject.traits.iter().filter(|x| *x != t).collect();
    let with_trait = plain.clone().with_trait(t);

    let without = ko_loss_rate(&plain, opponent, fights, base_seed)?;
    let with = ko_loss_rate(&with_trait, opponent, fights, base_seed)?;
    Ok(TraitComparison {
        without,
        with,
        fights,
    })
}

fn ko_loss_rate(
    subject: &FighterState,
    opponent: &FighterState,
    fights: usize,
    base_seed: u64,
) -> Result<f64, FightError> {
    if fights == 0 {
        return Ok(0.0);
    }
    let losses = (0..fights)
        .into_par_iter()
        .map(|i| {
            let config = FightConfig::new(base_seed.wrapping_add(i as u64));
            let r = simulate(subject, opponent, &config)?;
            let lost = matches!(r.method, Method::Ko | Method::Tko)
                && r.winner == Some(opponent.id);
            Ok(lost as usize)
        })
        .collect::<Result<Vec<usize>, FightError>>()?
        .into_iter()
        .sum::<usize>();
    Ok(losses as f64 / fights as f64)
}
