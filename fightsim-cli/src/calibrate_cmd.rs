//! Calibrate command - method distribution over a sampled roster
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_with_progress(), check_bands()
//! - Level 3: text and JSON renderers
//! - Level 4: argument parsing

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use fightsim_batch::{
    run_calibration_with, BandViolation, CalibrationConfig, CalibrationReport, MethodClass,
    Tolerance, DEFAULT_TITLE_RATE,
};

use crate::input::{load_tuning, percent};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct CalibrateArgs {
    /// Number of fights to simulate
    #[arg(long, default_value = "2000")]
    pub fights: usize,

    /// Base seed for roster sampling and fights
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Share of five-round title fights
    #[arg(long, default_value_t = DEFAULT_TITLE_RATE)]
    pub title_rate: f64,

    /// Allowed deviation from each target share
    #[arg(long, default_value = "0.06")]
    pub band: f64,

    /// Run fights on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Engine tuning JSON file
    #[arg(long, value_name = "FILE")]
    pub tuning: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run calibrate command
pub fn run(args: CalibrateArgs) -> Result<()> {
    let mut config = CalibrationConfig::new(args.fights)
        .with_seed(args.seed)
        .with_tuning(load_tuning(args.tuning.as_deref())?);
    config.title_rate = args.title_rate;
    if args.sequential {
        config = config.sequential();
    }

    tracing::info!(
        "Starting calibration: {} fights (seed={}, parallel={})",
        config.fights,
        config.base_seed,
        config.parallel
    );

    let report = run_with_progress(&config, !args.json)?;
    let tolerance = Tolerance::default().with_band(args.band);
    let violations = check_bands(&report, &tolerance);

    if args.json {
        print_json_report(&report, &tolerance, &violations)?;
    } else {
        print_text_report(&report, &tolerance);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_with_progress(config: &CalibrationConfig, show: bool) -> Result<CalibrationReport> {
    let bar = if show {
        ProgressBar::new(config.fights as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} fights ({eta})")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );

    let report = run_calibration_with(config, || bar.inc(1)).context("Calibration failed")?;
    bar.finish_and_clear();
    Ok(report)
}

/// Warn about every class outside its band
fn check_bands(report: &CalibrationReport, tolerance: &Tolerance) -> Vec<BandViolation> {
    let violations = tolerance.violations(&report.distribution);
    for v in &violations {
        tracing::warn!(
            "{} share {:.1}% outside {:.1}% ± {:.1}%",
            v.class.label(),
            v.actual * 100.0,
            v.target * 100.0,
            tolerance.band * 100.0
        );
    }
    if violations.is_empty() {
        tracing::info!("Distribution within tolerance bands");
    }
    violations
}

// ============================================================================
// LEVEL 3 - RENDERING
// ============================================================================

const CLASSES: [MethodClass; 3] = [
    MethodClass::Strike,
    MethodClass::Submission,
    MethodClass::Decision,
];

fn print_json_report(
    report: &CalibrationReport,
    tolerance: &Tolerance,
    violations: &[BandViolation],
) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonClass {
        class: &'static str,
        share: f64,
        target: f64,
        within_band: bool,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        fights: u32,
        draws: u32,
        title_fights: u32,
        avg_finish_round: f32,
        methods: Vec<(String, u32)>,
        classes: Vec<JsonClass>,
        within_bands: bool,
    }

    let output = JsonOutput {
        fights: report.fights,
        draws: report.draws,
        title_fights: report.title_fights,
        avg_finish_round: report.avg_finish_round,
        methods: report
            .distribution
            .entries()
            .into_iter()
            .map(|(m, c)| (m.to_string(), c))
            .collect(),
        classes: CLASSES
            .iter()
            .map(|&class| JsonClass {
                class: class.label(),
                share: report.class_fraction(class),
                target: tolerance.target(class),
                within_band: violations.iter().all(|v| v.class != class),
            })
            .collect(),
        within_bands: violations.is_empty(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_report(report: &CalibrationReport, tolerance: &Tolerance) {
    let total = report.distribution.total();

    println!("\n=== Calibration ===");
    println!("Fights:       {}", report.fights);
    println!("Title fights: {}", report.title_fights);
    println!("Draws:        {}", report.draws);
    println!("Avg finish round: {:.2}", report.avg_finish_round);

    println!("\nBy method:");
    for (method, count) in report.distribution.entries() {
        let share = percent(count, total);
        println!("  {:<22} {:>5} ({:.1}%)", method.to_string(), count, share);
    }

    println!("\nBy class:");
    for class in CLASSES {
        println!(
            "  {:<10} {:>5.1}%  (target {:.0}%)",
            class.label(),
            report.class_fraction(class) * 100.0,
            tolerance.target(class) * 100.0
        );
    }
}
