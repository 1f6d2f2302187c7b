//! Event cards - independent bouts resolved on one night
//!
//! Level 2 - Phase-level implementation

use fightsim_core::{simulate, FightConfig, FightError, FightResult, FighterState};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One scheduled bout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardBout {
    pub red: FighterState,
    pub blue: FighterState,
    /// Five rounds instead of three
    #[serde(default)]
    pub title: bool,
}

/// An event card, main event last
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    pub name: String,
    pub bouts: Vec<CardBout>,
}

/// Results of every bout, in card order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardResult {
    pub name: String,
    pub results: Vec<FightResult>,
}

impl CardResult {
    pub fn finishes(&self) -> usize {
        self.results.iter().filter(|r| r.is_finish()).count()
    }

    pub fn main_event(&self) -> Option<&FightResult> {
        self.results.last()
    }
}

/// Simulate every bout on the card; bout `i` uses `base_seed + i`
pub fn simulate_card(card: &EventCard, base_seed: u64) -> Result<CardResult, FightError> {
    let results = card
        .bouts
        .par_iter()
        .enumerate()
        .map(|(i, bout)| {
            let mut config = FightConfig::new(base_seed.wrapping_add(i as u64));
            if bout.title {
                config = config.title_fight();
            }
            simulate(&bout.red, &bout.blue, &config)
        })
        .collect::<Result<Vec<_>, FightError>>()?;

    tracing::debug!(card = %card.name, bouts = results.len(), "card complete");
    Ok(CardResult {
        name: card.name.clone(),
        results,
    })
}
