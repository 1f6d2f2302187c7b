//! Fight result assembly

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fighter::{Corner, FighterState};
use crate::judges::{DecisionKind, JudgeId, JudgeScorecard};
use crate::tick::{FinalState, FinishKind, TickEvent, TICK_SECONDS};

/// How the fight ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "KO")]
    Ko,
    #[serde(rename = "TKO")]
    Tko,
    Submission,
    #[serde(rename = "Decision-Unanimous")]
    DecisionUnanimous,
    #[serde(rename = "Decision-Split")]
    DecisionSplit,
    #[serde(rename = "Decision-Majority")]
    DecisionMajority,
    #[serde(rename = "Double-KD-TKO")]
    DoubleKnockdownTko,
}

impl Method {
    pub fn is_decision(self) -> bool {
        matches!(
            self,
            Method::DecisionUnanimous | Method::DecisionSplit | Method::DecisionMajority
        )
    }

    /// KO, TKO or double-knockdown TKO
    pub fn is_strike_finish(self) -> bool {
        matches!(self, Method::Ko | Method::Tko | Method::DoubleKnockdownTko)
    }
}

impl From<FinishKind> for Method {
    fn from(kind: FinishKind) -> Self {
        match kind {
            FinishKind::Knockout => Method::Ko,
            FinishKind::TechnicalKnockout => Method::Tko,
            FinishKind::Submission => Method::Submission,
            FinishKind::DoubleKnockdown => Method::DoubleKnockdownTko,
        }
    }
}

impl From<DecisionKind> for Method {
    fn from(kind: DecisionKind) -> Self {
        match kind {
            DecisionKind::Unanimous => Method::DecisionUnanimous,
            DecisionKind::Majority => Method::DecisionMajority,
            DecisionKind::Split => Method::DecisionSplit,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Ko => "KO",
            Method::Tko => "TKO",
            Method::Submission => "Submission",
            Method::DecisionUnanimous => "Decision (Unanimous)",
            Method::DecisionSplit => "Decision (Split)",
            Method::DecisionMajority => "Decision (Majority)",
            Method::DoubleKnockdownTko => "Double-KD TKO",
        };
        write!(f, "{s}")
    }
}

/// Post-fight state of one fighter, for psychology and injury consumers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterDelta {
    pub id: u64,
    pub final_stamina: f64,
    pub final_momentum: f64,
    pub knockdowns: u32,
    pub stamina_change: f64,
    pub momentum_change: f64,
}

impl FighterDelta {
    pub(crate) fn new(before: &FighterState, after: &FinalState) -> Self {
        Self {
            id: before.id,
            final_stamina: after.stamina,
            final_momentum: after.momentum,
            knockdowns: after.knockdowns,
            stamina_change: after.stamina - before.stamina,
            momentum_change: after.momentum - before.momentum,
        }
    }
}

/// Complete outcome of one simulated fight
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FightResult {
    pub red_id: u64,
    pub blue_id: u64,
    /// Winner's fighter id; None for a draw or double knockdown
    pub winner: Option<u64>,
    pub winner_corner: Option<Corner>,
    pub method: Method,
    /// Round the fight ended in
    pub round: u8,
    /// Seconds elapsed in the ending round
    pub time_seconds: u16,
    pub scheduled_rounds: u8,
    pub judges: Vec<JudgeId>,
    /// Empty unless the fight went to the cards
    pub scorecards: Vec<JudgeScorecard>,
    pub events: Vec<TickEvent>,
    pub red: FighterDelta,
    pub blue: FighterDelta,
}

impl FightResult {
    /// Winner's fighter id
    pub fn winner_id(&self) -> Option<u64> {
        self.winner
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn is_finish(&self) -> bool {
        !self.method.is_decision()
    }

    /// Ending time in the round as m:ss
    pub fn time_display(&self) -> String {
        format!("{}:{:02}", self.time_seconds / 60, self.time_seconds % 60)
    }

    pub fn delta(&self, corner: Corner) -> &FighterDelta {
        match corner {
            Corner::Red => &self.red,
            Corner::Blue => &self.blue,
        }
    }

    /// Fighter id in the losing corner, if there is a single loser
    pub fn loser_id(&self) -> Option<u64> {
        self.winner_corner.map(|c| self.delta(c.opponent()).id)
    }

    /// Total knockdowns suffered by each corner
    pub fn knockdowns(&self) -> (u32, u32) {
        (self.red.knockdowns, self.blue.knockdowns)
    }
}

/// Seconds into the round at the end of a 1-based tick
pub(crate) fn tick_end_seconds(tick: u8) -> u16 {
    tick as u16 * TICK_SECONDS
}

impl fmt::Display for FightResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner_corner {
            Some(corner) => write!(
                f,
                "{} corner (#{}) wins by {}, R{} {}",
                corner,
                self.delta(corner).id,
                self.method,
                self.round,
                self.time_display()
            ),
            None => write!(
                f,
                "No winner: {}, R{} {}",
                self.method,
                self.round,
                self.time_display()
            ),
        }
    }
}
