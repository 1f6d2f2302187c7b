//! Card command - resolve every bout on an event card
//!
//! Level 1: run(); Level 3: renderers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fightsim_batch::{simulate_card, CardResult, EventCard};

use crate::input::load_json;

#[derive(Args)]
pub struct CardArgs {
    /// Event card JSON file
    #[arg(long, value_name = "FILE")]
    pub card: PathBuf,

    /// Base seed; bout i uses seed + i
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run card command
pub fn run(args: CardArgs) -> Result<()> {
    let card: EventCard = load_json(&args.card, "event card")?;
    tracing::info!("Starting card: {} ({} bouts)", card.name, card.bouts.len());

    let result = simulate_card(&card, args.seed).context("Card failed")?;
    let finished = result.finishes();
    tracing::info!("{finished} of {} bouts finished", result.results.len());

    if args.json {
        print_json_result(&card, &result)?;
    } else {
        print_text_result(&card, &result);
    }
    Ok(())
}

fn print_json_result(card: &EventCard, result: &CardResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonBout {
        red: String,
        blue: String,
        winner: Option<u64>,
        method: String,
        round: u8,
        time: String,
        title: bool,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        name: String,
        finishes: usize,
        bouts: Vec<JsonBout>,
    }

    let output = JsonOutput {
        name: result.name.clone(),
        finishes: result.finishes(),
        bouts: card
            .bouts
            .iter()
            .zip(&result.results)
            .map(|(bout, r)| JsonBout {
                red: bout.red.display_name(),
                blue: bout.blue.display_name(),
                winner: r.winner,
                method: r.method.to_string(),
                round: r.round,
                time: r.time_display(),
                title: bout.title,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_result(card: &EventCard, result: &CardResult) {
    println!("\n=== {} ===", result.name);
    for (bout, r) in card.bouts.iter().zip(&result.results).rev() {
        let (red, blue) = (bout.red.display_name(), bout.blue.display_name());
        let outcome = match r.winner {
            Some(id) if id == bout.red.id => format!("{red} def. {blue}"),
            Some(_) => format!("{blue} def. {red}"),
            None => format!("{red} vs {blue} - no winner"),
        };
        let time = r.time_display();
        println!("  {:<48} {} R{} {}", outcome, r.method, r.round, time);
    }
}
