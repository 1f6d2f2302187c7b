//! Series command - head-to-head win rates between two fighters
//!
//! Level 1: run(); Level 3: renderers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fightsim_batch::{run_series, SeriesConfig, SeriesResult};
use fightsim_core::FighterState;

use crate::input::{load_fighter, load_tuning, percent};

#[derive(Args)]
pub struct SeriesArgs {
    /// First fighter JSON file (red in even fights)
    #[arg(long, value_name = "FILE")]
    pub first: PathBuf,

    /// Second fighter JSON file
    #[arg(long, value_name = "FILE")]
    pub second: PathBuf,

    /// Number of fights (corners alternate)
    #[arg(long, default_value = "100")]
    pub fights: usize,

    /// Base seed; fight i uses seed + i
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Scheduled rounds per fight
    #[arg(long, default_value = "3")]
    pub rounds: u8,

    /// Engine tuning JSON file
    #[arg(long, value_name = "FILE")]
    pub tuning: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run series command
pub fn run(args: SeriesArgs) -> Result<()> {
    let first = load_fighter(&args.first)?;
    let second = load_fighter(&args.second)?;
    let config = SeriesConfig::new(args.fights)
        .with_seed(args.seed)
        .with_rounds(args.rounds)
        .with_tuning(load_tuning(args.tuning.as_deref())?);

    tracing::info!(
        "Starting series: {} vs {} ({} fights)",
        first.display_name(),
        second.display_name(),
        config.fights
    );

    let result = run_series(&first, &second, &config).context("Series failed")?;

    if args.json {
        print_json_result(&first, &second, &result)?;
    } else {
        print_text_result(&first, &second, &result);
    }
    Ok(())
}

fn print_json_result(first: &FighterState, second: &FighterState, r: &SeriesResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        first: String,
        second: String,
        fights: u32,
        first_wins: u32,
        second_wins: u32,
        draws: u32,
        first_win_rate: f32,
        avg_round: f32,
        methods: Vec<(String, u32)>,
    }

    let output = JsonOutput {
        first: first.display_name(),
        second: second.display_name(),
        fights: r.fights_played,
        first_wins: r.first_wins,
        second_wins: r.second_wins,
        draws: r.draws,
        first_win_rate: r.first_win_rate(),
        avg_round: r.avg_round,
        methods: r
            .distribution
            .entries()
            .into_iter()
            .map(|(m, c)| (m.to_string(), c))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_result(first: &FighterState, second: &FighterState, r: &SeriesResult) {
    let total = r.fights_played;

    println!("\n=== Series Results ===");
    println!("Total fights: {}", total);
    println!(
        "{:<14} {} ({:.1}%)",
        first.display_name(),
        r.first_wins,
        percent(r.first_wins, total)
    );
    println!(
        "{:<14} {} ({:.1}%)",
        second.display_name(),
        r.second_wins,
        percent(r.second_wins, total)
    );
    println!(
        "Draws:         {} ({:.1}%)",
        r.draws,
        percent(r.draws, total)
    );
    println!("Avg round:     {:.2}", r.avg_round);
}
