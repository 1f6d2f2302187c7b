//! Knockdown state machine
//!
//! Every strike-based finish passes through here. The only way into
//! `Finished` is from `Down`, so a trace can never contain a Standing ->
//! Finished edge.
//!
//! ```text
//! Standing --strike--> Hurt --strike--> Down --stoppage--> Finished
//!     |                  |                |
//!     +---one punch----->+                +--survived--> Recovering --> Standing
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineTuning;
use crate::modifiers::TraitProfile;

// ============================================================================
// STATES AND TRANSITIONS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnockdownState {
    Standing,
    Hurt,
    Down,
    Recovering,
    Finished,
}

impl KnockdownState {
    /// Legal transition table
    pub fn can_transition_to(self, to: KnockdownState) -> bool {
        use KnockdownState::*;
        matches!(
            (self, to),
            (Standing, Hurt)
                | (Standing, Down)
                | (Hurt, Down)
                | (Hurt, Standing)
                | (Down, Finished)
                | (Down, Recovering)
                | (Recovering, Standing)
                | (Recovering, Hurt)
                | (Recovering, Down)
        )
    }
}

/// What moved the fighter between states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    Strike,
    OnePunch,
    AccumulatedDamage,
    Stoppage,
    Survived,
    Recovered,
    HurtExpired,
    RoundReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: KnockdownState,
    pub to: KnockdownState,
    pub cause: TransitionCause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("illegal knockdown transition {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: KnockdownState,
    pub to: KnockdownState,
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Per-fighter damage thresholds, fixed for the fight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Single-strike damage that can hurt a standing fighter
    pub hurt: f64,
    /// Single-strike damage that can drop a hurt fighter
    pub knockdown: f64,
    /// Single-strike damage that can drop a fighter outright
    pub one_punch: f64,
    pub chin: f64,
    /// Added to the one-punch probability by the attacker's power
    pub one_punch_bonus: f64,
}

impl Thresholds {
    pub fn new(chin: f64, profile: &TraitProfile, tuning: &EngineTuning) -> Self {
        let hurt = tuning.hurt_base
            + tuning.hurt_per_chin * chin
            + profile.coefficients.hurt_threshold_bonus;
        Self {
            hurt,
            knockdown: hurt * tuning.knockdown_ratio,
            one_punch: hurt * tuning.one_punch_ratio,
            chin,
            one_punch_bonus: 0.0,
        }
    }

    /// Same thresholds against an attacker with the given one-punch bonus
    pub fn against(mut self, one_punch_bonus: f64) -> Self {
        self.one_punch_bonus = one_punch_bonus;
        self
    }

    pub fn one_punch_probability(&self, damage: f64) -> f64 {
        if damage <= self.one_punch {
            return 0.0;
        }
        ((damage - self.one_punch) / 25.0 + 0.05).min(0.5) + self.one_punch_bonus
    }

    pub fn hurt_probability(&self, damage: f64) -> f64 {
        if damage <= self.hurt {
            return 0.0;
        }
        ((damage - self.hurt) / 20.0 + 0.10).min(0.6) * (1.0 - self.chin / 150.0)
    }

    pub fn knockdown_probability(&self, damage: f64) -> f64 {
        if damage <= self.knockdown {
            return 0.0;
        }
        ((damage - self.knockdown) / 15.0 + 0.15).min(0.7) * (1.0 - self.chin / 200.0)
    }
}

// ============================================================================
// MACHINE
// ============================================================================

/// One fighter's knockdown state for the duration of a fight
#[derive(Clone, Debug, PartialEq)]
pub struct KnockdownStateMachine {
    state: KnockdownState,
    hurt_ticks: u8,
    hurt_duration: u8,
    knockdowns: u32,
    round_knockdowns: u32,
    penalty: bool,
    one_punch: bool,
}

impl KnockdownStateMachine {
    pub fn new(hurt_duration: u8) -> Self {
        Self {
            state: KnockdownState::Standing,
            hurt_ticks: 0,
            hurt_duration,
            knockdowns: 0,
            round_knockdowns: 0,
            penalty: false,
            one_punch: false,
        }
    }

    pub fn state(&self) -> KnockdownState {
        self.state
    }

    pub fn is_hurt(&self) -> bool {
        self.state == KnockdownState::Hurt
    }

    pub fn is_down(&self) -> bool {
        self.state == KnockdownState::Down
    }

    pub fn knockdowns(&self) -> u32 {
        self.knockdowns
    }

    pub fn round_knockdowns(&self) -> u32 {
        self.round_knockdowns
    }

    /// Survived a knockdown this round
    pub fn penalty_active(&self) -> bool {
        self.penalty
    }

    /// Whether the current Down came from a single strike
    pub fn down_from_one_punch(&self) -> bool {
        self.one_punch
    }

    /// Move to `to` if the table allows it
    pub fn transition(
        &mut self,
        to: KnockdownState,
        cause: TransitionCause,
    ) -> Result<Transition, IllegalTransition> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(IllegalTransition { from, to });
        }
        self.state = to;
        match to {
            KnockdownState::Down => {
                self.knockdowns += 1;
                self.round_knockdowns += 1;
                self.one_punch = cause == TransitionCause::OnePunch;
            }
            KnockdownState::Hurt => self.hurt_ticks = self.hurt_duration,
            KnockdownState::Recovering => self.penalty = true,
            _ => {}
        }
        tracing::trace!(?from, ?to, ?cause, "knockdown transition");
        Ok(Transition { from, to, cause })
    }

    /// Opening bell of a round: clear Hurt/Recovering and round counters
    pub fn start_round(&mut self) -> Result<Option<Transition>, IllegalTransition> {
        self.round_knockdowns = 0;
        self.penalty = false;
        match self.state {
            KnockdownState::Hurt | KnockdownState::Recovering => self
                .transition(KnockdownState::Standing, TransitionCause::RoundReset)
                .map(Some),
            _ => Ok(None),
        }
    }

    /// Start of a tick: Recovering fighters stand, Hurt wears off
    pub fn start_tick(&mut self) -> Result<Option<Transition>, IllegalTransition> {
        match self.state {
            KnockdownState::Recovering => self
                .transition(KnockdownState::Standing, TransitionCause::Recovered)
                .map(Some),
            KnockdownState::Hurt => {
                self.hurt_ticks = self.hurt_ticks.saturating_sub(1);
                if self.hurt_ticks == 0 {
                    self.transition(KnockdownState::Standing, TransitionCause::HurtExpired)
                        .map(Some)
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    /// A landed strike of `damage`. Draws at most two rolls.
    pub fn absorb_strike<R: Rng>(
        &mut self,
        damage: f64,
        thresholds: &Thresholds,
        rng: &mut R,
    ) -> Result<Option<Transition>, IllegalTransition> {
        match self.state {
            KnockdownState::Standing | KnockdownState::Recovering => {
                let p = thresholds.one_punch_probability(damage);
                if p > 0.0 && rng.gen::<f64>() < p {
                    return self
                        .transition(KnockdownState::Down, TransitionCause::OnePunch)
                        .map(Some);
                }
                let p = thresholds.hurt_probability(damage);
                if p > 0.0 && rng.gen::<f64>() < p {
                    return self
                        .transition(KnockdownState::Hurt, TransitionCause::Strike)
                        .map(Some);
                }
                Ok(None)
            }
            KnockdownState::Hurt => {
                let p = thresholds.knockdown_probability(damage);
                if p > 0.0 && rng.gen::<f64>() < p {
                    return self
                        .transition(KnockdownState::Down, TransitionCause::Strike)
                        .map(Some);
                }
                Ok(None)
            }
            KnockdownState::Down | KnockdownState::Finished => Ok(None),
        }
    }

    /// Accumulated damage drops the fighter
    pub fn force_down(&mut self) -> Result<Transition, IllegalTransition> {
        self.transition(KnockdownState::Down, TransitionCause::AccumulatedDamage)
    }

    /// Referee decision on a downed fighter
    pub fn resolve_down(&mut self, stopped: bool) -> Result<Transition, IllegalTransition> {
        if stopped {
            self.transition(KnockdownState::Finished, TransitionCause::Stoppage)
        } else {
            self.transition(KnockdownState::Recovering, TransitionCause::Survived)
        }
    }
}
