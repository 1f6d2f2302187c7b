//! FightSim CLI - Command-line interface
//!
//! Commands:
//! - fight: Resolve one bout between two fighter files
//! - calibrate: Method distribution over a sampled roster
//! - card: Resolve every bout on an event card
//! - series: Head-to-head win rates with corner alternation

mod calibrate_cmd;
mod card_cmd;
mod fight_cmd;
mod input;
mod series_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fightsim")]
#[command(about = "Deterministic MMA fight resolution engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one bout
    Fight(fight_cmd::FightArgs),
    /// Check the method distribution over many sampled fights
    Calibrate(calibrate_cmd::CalibrateArgs),
    /// Resolve an event card
    Card(card_cmd::CardArgs),
    /// Run a head-to-head series
    Series(series_cmd::SeriesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fight(args) => fight_cmd::run(args),
        Commands::Calibrate(args) => calibrate_cmd::run(args),
        Commands::Card(args) => card_cmd::run(args),
        Commands::Series(args) => series_cmd::run(args),
    }
}
