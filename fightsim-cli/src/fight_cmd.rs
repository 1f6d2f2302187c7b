//! Fight command - resolve one bout between two fighter files
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_inputs(), fightsim_core::simulate()
//! - Level 3: text and JSON renderers
//! - Level 4: argument parsing

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fightsim_core::config::DEFAULT_JUDGES;
use fightsim_core::{FightConfig, FightResult, FighterState, JudgeSelection};

use crate::input::{load_fighter, load_tuning};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct FightArgs {
    /// Red corner fighter JSON file
    #[arg(long, value_name = "FILE")]
    pub red: PathBuf,

    /// Blue corner fighter JSON file
    #[arg(long, value_name = "FILE")]
    pub blue: PathBuf,

    /// Fight seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Five-round title fight
    #[arg(long)]
    pub title: bool,

    /// Scheduled rounds (overrides --title)
    #[arg(long)]
    pub rounds: Option<u8>,

    /// Number of judges drawn for the panel
    #[arg(long, default_value_t = DEFAULT_JUDGES)]
    pub judges: usize,

    /// Engine tuning JSON file
    #[arg(long, value_name = "FILE")]
    pub tuning: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the per-tick event log in JSON output
    #[arg(long)]
    pub events: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run fight command
pub fn run(args: FightArgs) -> Result<()> {
    let (red, blue, config) = load_inputs(&args)?;

    tracing::info!(
        "Starting fight: {} vs {} ({} rounds, seed={})",
        red.display_name(),
        blue.display_name(),
        config.rounds,
        config.seed
    );

    let result = fightsim_core::simulate(&red, &blue, &config).context("Fight failed")?;
    tracing::info!("{}", result);

    if args.json {
        print_json_result(&red, &blue, &result, args.events)?;
    } else {
        print_text_result(&red, &blue, &result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_inputs(args: &FightArgs) -> Result<(FighterState, FighterState, FightConfig)> {
    let red = load_fighter(&args.red)?;
    let blue = load_fighter(&args.blue)?;
    let tuning = load_tuning(args.tuning.as_deref())?;

    let mut config = FightConfig::new(args.seed)
        .with_judges(JudgeSelection::Random { count: args.judges })
        .with_tuning(tuning);
    if args.title {
        config = config.title_fight();
    }
    if let Some(rounds) = args.rounds {
        config = config.with_rounds(rounds);
    }
    Ok((red, blue, config))
}

// ============================================================================
// LEVEL 3 - RENDERING
// ============================================================================

fn print_json_result(
    red: &FighterState,
    blue: &FighterState,
    result: &FightResult,
    include_events: bool,
) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        red_name: String,
        blue_name: String,
        summary: String,
        time: String,
        #[serde(flatten)]
        result: &'a FightResult,
    }

    let mut trimmed;
    let result = if include_events {
        result
    } else {
        trimmed = result.clone();
        trimmed.events.clear();
        &trimmed
    };

    let output = JsonOutput {
        red_name: red.display_name(),
        blue_name: blue.display_name(),
        summary: result.to_string(),
        time: result.time_display(),
        result,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_result(red: &FighterState, blue: &FighterState, result: &FightResult) {
    println!("\n=== Fight Result ===");
    println!("Red:   {}", red.display_name());
    println!("Blue:  {}", blue.display_name());
    println!("Result: {}", result);

    if !result.scorecards.is_empty() {
        println!("\nScorecards:");
        for card in &result.scorecards {
            println!("  {:<22} {}-{}", card.name, card.red_total, card.blue_total);
        }
    }

    let (red_kd, blue_kd) = result.knockdowns();
    println!("\nKnockdowns:    red {}, blue {}", red_kd, blue_kd);
    println!(
        "Final stamina: red {:.1}, blue {:.1}",
        result.red.final_stamina, result.blue.final_stamina
    );
    println!(
        "Momentum:      red {:+.2}, blue {:+.2}",
        result.red.final_momentum, result.blue.final_momentum
    );
}
