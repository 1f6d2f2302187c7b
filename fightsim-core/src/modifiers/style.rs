//! Fighting styles and the style matchup matrix

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base fighting style
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Striker,
    Wrestler,
    Grappler,
    #[serde(rename = "Well-Rounded", alias = "WellRounded")]
    WellRounded,
}

pub const ALL_STYLES: [Style; 4] = [
    Style::Striker,
    Style::Wrestler,
    Style::Grappler,
    Style::WellRounded,
];

impl Style {
    fn index(self) -> usize {
        match self {
            Style::Striker => 0,
            Style::Wrestler => 1,
            Style::Grappler => 2,
            Style::WellRounded => 3,
        }
    }

    /// Matchup coefficients with `self` as the attacker
    pub fn matchup(self, defender: Style) -> StyleMatchup {
        MATCHUP[self.index()][defender.index()]
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Style::Striker => "Striker",
            Style::Wrestler => "Wrestler",
            Style::Grappler => "Grappler",
            Style::WellRounded => "Well-Rounded",
        };
        write!(f, "{s}")
    }
}

/// Zone-transition coefficients for one attacker/defender pairing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleMatchup {
    /// Added to the attacker's takedown probability
    pub takedown: f64,
    /// Base weight of the clinch zone (symmetric)
    pub clinch: f64,
    /// Ground stickiness; lower values keep the fight on the mat longer
    pub stickiness: f64,
}

const fn m(takedown: f64, clinch: f64, stickiness: f64) -> StyleMatchup {
    StyleMatchup {
        takedown,
        clinch,
        stickiness,
    }
}

/// Attacker (row) x defender (column).
/// Order: Striker, Wrestler, Grappler, Well-Rounded.
pub const MATCHUP: [[StyleMatchup; 4]; 4] = [
    // Striker
    [m(-0.05, 0.10, 1.0), m(-0.08, 0.30, 1.0), m(-0.04, 0.20, 1.0), m(-0.02, 0.20, 1.0)],
    // Wrestler
    [m(0.10, 0.30, 1.0), m(0.05, 0.20, 1.0), m(0.03, 0.20, 1.0), m(0.05, 0.20, 1.0)],
    // Grappler
    [m(0.08, 0.20, 1.0), m(0.03, 0.20, 1.0), m(0.08, 0.20, 0.80), m(0.03, 0.20, 1.0)],
    // Well-Rounded
    [m(0.0, 0.20, 1.0), m(0.0, 0.20, 1.0), m(0.0, 0.20, 1.0), m(0.0, 0.20, 1.0)],
];

/// Extra takedown weight for a Well-Rounded fighter losing the standing exchange
pub const WELL_ROUNDED_CATCH_UP: f64 = 0.05;
/// Chance a Wrestler tries to drag a clinch exchange to the mat
pub const CLINCH_DRAG_ATTEMPT: f64 = 0.40;
/// Added to the takedown probability of a clinch drag
pub const CLINCH_DRAG_BONUS: f64 = 0.10;
