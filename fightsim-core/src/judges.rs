//! Judge scoring panel
//!
//! Five fixed judge profiles read each round from the tick log through their
//! own bias weights, add a little subjectivity noise and score it on the
//! 10-point-must system.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::JudgeSelection;
use crate::error::{FightError, Result};
use crate::fighter::Corner;
use crate::tick::{SideReport, TickEvent, TICKS_PER_ROUND};

/// Number of judge profiles available
pub const PANEL_SIZE: usize = 5;

/// Subjectivity noise as a fraction of the round's total activity
const NOISE: f64 = 0.06;
const WIDE_MARGIN: f64 = 0.45;
const DOMINANT_MARGIN: f64 = 0.75;

// ============================================================================
// PROFILES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeId {
    Okafor,
    Lindqvist,
    Moreau,
    Ashby,
    Venkataraman,
}

pub const ALL_JUDGES: [JudgeId; PANEL_SIZE] = [
    JudgeId::Okafor,
    JudgeId::Lindqvist,
    JudgeId::Moreau,
    JudgeId::Ashby,
    JudgeId::Venkataraman,
];

/// Bias weights of one judge
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JudgeProfile {
    pub id: JudgeId,
    pub name: &'static str,
    pub striking: f64,
    pub grappling: f64,
    pub aggression: f64,
    pub damage: f64,
}

impl JudgeId {
    pub fn profile(self) -> JudgeProfile {
        let (name, striking, grappling, aggression, damage) = match self {
            JudgeId::Okafor => ("Miriam Okafor", 0.45, 0.15, 0.15, 0.25),
            JudgeId::Lindqvist => ("Tomas Lindqvist", 0.20, 0.45, 0.10, 0.25),
            JudgeId::Moreau => ("Celeste Moreau", 0.25, 0.20, 0.35, 0.20),
            JudgeId::Ashby => ("Raymond Ashby", 0.25, 0.15, 0.10, 0.50),
            JudgeId::Venkataraman => ("Priya Venkataraman", 0.30, 0.30, 0.15, 0.25),
        };
        JudgeProfile {
            id: self,
            name,
            striking,
            grappling,
            aggression,
            damage,
        }
    }
}

impl fmt::Display for JudgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

/// Resolve a selection into a concrete panel, drawing from `rng` if random
pub fn select_panel<R: Rng>(selection: &JudgeSelection, rng: &mut R) -> Vec<JudgeId> {
    match selection {
        JudgeSelection::Panel(judges) => judges.clone(),
        JudgeSelection::Random { count } => {
            let mut pool = ALL_JUDGES.to_vec();
            pool.shuffle(rng);
            pool.truncate(*count);
            pool
        }
    }
}

// ============================================================================
// ROUND READINGS
// ============================================================================

/// One corner's round totals as read from the tick log
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoundActivity {
    pub strike_damage: f64,
    pub grappling_damage: f64,
    pub control_ticks: u32,
    pub strikes_landed: u32,
    pub takedowns: u32,
    pub submission_attempts: u32,
    pub knockdowns: u32,
}

impl RoundActivity {
    fn add(&mut self, side: &SideReport) {
        self.strike_damage += side.strike_damage;
        self.grappling_damage += side.grappling_damage;
        self.control_ticks += side.control as u32;
        self.strikes_landed += side.strikes_landed;
        self.takedowns += side.takedowns;
        self.submission_attempts += side.submission_attempts;
        self.knockdowns += side.knockdowns;
    }

    /// Bias-weighted reading of this activity
    fn reading(&self, judge: &JudgeProfile) -> f64 {
        let striking = self.strike_damage;
        let grappling =
            self.grappling_damage + 3.0 * self.control_ticks as f64 + 4.0 * self.takedowns as f64;
        let aggression = 2.0 * self.strikes_landed as f64
            + 3.0 * self.submission_attempts as f64
            + 3.0 * self.takedowns as f64;
        let damage = self.strike_damage + self.grappling_damage + 15.0 * self.knockdowns as f64;
        judge.striking * striking
            + judge.grappling * grappling
            + judge.aggression * aggression
            + judge.damage * damage
    }
}

/// Red and blue activity for each round, from the tick log
pub fn round_activity(events: &[TickEvent], rounds: u8) -> Vec<[RoundActivity; 2]> {
    let mut out = vec![[RoundActivity::default(); 2]; rounds as usize];
    for event in events {
        if let Some(slot) = out.get_mut(event.round as usize - 1) {
            slot[0].add(&event.red);
            slot[1].add(&event.blue);
        }
    }
    out
}

// ============================================================================
// SCORECARDS
// ============================================================================

/// One judge's score for one round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScorecard {
    pub round: u8,
    pub red: u8,
    pub blue: u8,
}

/// One judge's card for the whole fight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeScorecard {
    pub judge: JudgeId,
    pub name: String,
    pub rounds: Vec<RoundScorecard>,
    pub red_total: u32,
    pub blue_total: u32,
}

impl JudgeScorecard {
    /// Winner on this card, None for a drawn card
    pub fn winner(&self) -> Option<Corner> {
        match self.red_total.cmp(&self.blue_total) {
            std::cmp::Ordering::Greater => Some(Corner::Red),
            std::cmp::Ordering::Less => Some(Corner::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Unanimous,
    Majority,
    Split,
}

/// Panel verdict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub winner: Option<Corner>,
    pub kind: DecisionKind,
}

/// Score one round from one judge's reading of both corners
pub fn score_round(round: u8, red: f64, blue: f64, red_kds: u32, blue_kds: u32) -> RoundScorecard {
    if red == blue {
        return RoundScorecard {
            round,
            red: 10,
            blue: 10,
        };
    }
    let total = red.abs() + blue.abs();
    let margin = if total > 0.0 {
        (red - blue).abs() / total
    } else {
        0.0
    };
    let leader_kds = if red > blue { red_kds } else { blue_kds };
    let two_knockdowns = leader_kds >= 2;
    let losing = if margin >= DOMINANT_MARGIN && two_knockdowns {
        7
    } else if margin >= WIDE_MARGIN || two_knockdowns {
        8
    } else {
        9
    };
    if red > blue {
        RoundScorecard {
            round,
            red: 10,
            blue: losing,
        }
    } else {
        RoundScorecard {
            round,
            red: losing,
            blue: 10,
        }
    }
}

/// Every judge scores every round, then the cards are aggregated
pub fn score_fight<R: Rng>(
    panel: &[JudgeId],
    events: &[TickEvent],
    rounds: u8,
    rng: &mut R,
) -> Result<(Vec<JudgeScorecard>, Decision)> {
    let activity = round_activity(events, rounds);
    let mut cards = Vec::with_capacity(panel.len());

    for &judge in panel {
        let profile = judge.profile();
        let mut card = JudgeScorecard {
            judge,
            name: profile.name.to_string(),
            rounds: Vec::with_capacity(rounds as usize),
            red_total: 0,
            blue_total: 0,
        };
        for (i, [red, blue]) in activity.iter().enumerate() {
            let round = i as u8 + 1;
            let red_read = red.reading(&profile);
            let blue_read = blue.reading(&profile);
            let noise = rng.gen_range(-NOISE..=NOISE) * (red_read + blue_read);
            let score = score_round(
                round,
                red_read + noise,
                blue_read,
                red.knockdowns,
                blue.knockdowns,
            );
            check_score(&score)?;
            card.red_total += score.red as u32;
            card.blue_total += score.blue as u32;
            card.rounds.push(score);
        }
        tracing::trace!(
            judge = %judge,
            red = card.red_total,
            blue = card.blue_total,
            "scorecard"
        );
        cards.push(card);
    }

    let decision = aggregate(&cards);
    Ok((cards, decision))
}

fn check_score(score: &RoundScorecard) -> Result<()> {
    for value in [score.red, score.blue] {
        if !(7..=10).contains(&value) {
            return Err(FightError::InvariantViolation {
                round: score.round,
                tick: TICKS_PER_ROUND,
                detail: format!("round score {value} outside 7-10"),
            });
        }
    }
    Ok(())
}

/// Majority-agreement rule over the judges' cards.
///
/// With a majority winner: all judges agree is Unanimous; the rest of the
/// panel scored it a draw is Majority; any dissenting card is Split. Without a
/// majority winner the fight is a draw: Unanimous if every card is drawn,
/// Majority if drawn cards are a majority, Split otherwise.
pub fn aggregate(cards: &[JudgeScorecard]) -> Decision {
    let n = cards.len();
    let votes = |corner: Corner| cards.iter().filter(|c| c.winner() == Some(corner)).count();
    let red = votes(Corner::Red);
    let blue = votes(Corner::Blue);
    let draws = n - red - blue;

    let majority = |votes: usize| votes * 2 > n;
    let (winner, for_winner, against) = if majority(red) {
        (Some(Corner::Red), red, blue)
    } else if majority(blue) {
        (Some(Corner::Blue), blue, red)
    } else {
        (None, 0, 0)
    };

    let kind = match winner {
        Some(_) if for_winner == n => DecisionKind::Unanimous,
        Some(_) if against == 0 => DecisionKind::Majority,
        Some(_) => DecisionKind::Split,
        None if draws == n => DecisionKind::Unanimous,
        None if majority(draws) => DecisionKind::Majority,
        None => DecisionKind::Split,
    };
    Decision { winner, kind }
}
