//! Head-to-head series - many fights between two fixed fighters
//!
//! Level 2 - Phase-level implementation

use fightsim_core::{simulate, FightError, FightResult, FighterState};
use rayon::prelude::*;

use crate::config::SeriesConfig;
use crate::report::MethodDistribution;

/// Result of a series
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesResult {
    /// Wins for the first fighter
    pub first_wins: u32,
    /// Wins for the second fighter
    pub second_wins: u32,
    /// Drawn decisions and double knockdowns
    pub draws: u32,
    /// Average ending round
    pub avg_round: f32,
    pub fights_played: u32,
    pub distribution: MethodDistribution,
}

impl SeriesResult {
    pub fn empty() -> Self {
        Self {
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            avg_round: 0.0,
            fights_played: 0,
            distribution: MethodDistribution::new(),
        }
    }

    /// Combine two results
    pub fn combine(&self, other: &SeriesResult) -> SeriesResult {
        let total = self.fights_played + other.fights_played;
        let avg_round = if total > 0 {
            (self.avg_round * self.fights_played as f32
                + other.avg_round * other.fights_played as f32)
                / total as f32
        } else {
            0.0
        };

        SeriesResult {
            first_wins: self.first_wins + other.first_wins,
            second_wins: self.second_wins + other.second_wins,
            draws: self.draws + other.draws,
            avg_round,
            fights_played: total,
            distribution: self.distribution.combine(&other.distribution),
        }
    }

    pub fn first_win_rate(&self) -> f32 {
        self.rate(self.first_wins)
    }

    pub fn second_win_rate(&self) -> f32 {
        self.rate(self.second_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    /// Wins = 1.0, Draws = 0.5
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    fn rate(&self, n: u32) -> f32 {
        if self.fights_played == 0 {
            0.0
        } else {
            n as f32 / self.fights_played as f32
        }
    }
}

/// Run a series between two fighters (Level 2 phase)
///
/// Corners alternate every fight; `first` starts in red.
pub fn run_series(
    first: &FighterState,
    second: &FighterState,
    config: &SeriesConfig,
) -> Result<SeriesResult, FightError> {
    if config.fights == 0 {
        return Ok(SeriesResult::empty());
    }

    let slots = prepare_slots(config.fights);
    let fights = if config.parallel {
        slots
            .par_iter()
            .map(|s| fight_slot(first, second, config, s))
            .collect::<Result<Vec<_>, FightError>>()?
    } else {
        slots
            .iter()
            .map(|s| fight_slot(first, second, config, s))
            .collect::<Result<Vec<_>, FightError>>()?
    };
    Ok(aggregate(first.id, &fights))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

#[derive(Clone, Copy)]
struct Slot {
    first_in_red: bool,
    index: usize,
}

fn prepare_slots(fights: usize) -> Vec<Slot> {
    (0..fights)
        .map(|i| Slot {
            first_in_red: i % 2 == 0,
            index: i,
        })
        .collect()
}

fn fight_slot(
    first: &FighterState,
    second: &FighterState,
    config: &SeriesConfig,
    slot: &Slot,
) -> Result<FightResult, FightError> {
    let fc = config.fight_config(slot.index);
    if slot.first_in_red {
        simulate(first, second, &fc)
    } else {
        simulate(second, first, &fc)
    }
}

fn aggregate(first_id: u64, fights: &[FightResult]) -> SeriesResult {
    let mut result = SeriesResult::empty();
    let mut total_rounds = 0u32;

    for fight in fights {
        total_rounds += fight.round as u32;
        result.distribution.record(fight.method);
        match fight.winner {
            Some(id) if id == first_id => result.first_wins += 1,
            Some(_) => result.second_wins += 1,
            None => result.draws += 1,
        }
    }

    result.fights_played = fights.len() as u32;
    if result.fights_played > 0 {
        result.avg_round = total_rounds as f32 / result.fights_played as f32;
    }
    result
}
