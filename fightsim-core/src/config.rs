//! Fight configuration and engine tuning
//!
//! Every coupled tuning axis lives in [`EngineTuning`]. Zone weights, attempt
//! rates and finish ramps interact, so changes here must be re-checked against
//! the full method distribution rather than one axis at a time.

use serde::{Deserialize, Serialize};

use crate::error::{FightError, Result};
use crate::judges::{JudgeId, PANEL_SIZE};

/// Default round count
pub const DEFAULT_ROUNDS: u8 = 3;
/// Title fights are scheduled for five rounds
pub const TITLE_ROUNDS: u8 = 5;
/// Upper bound on scheduled rounds
pub const MAX_ROUNDS: u8 = 5;
/// Judges drawn by default
pub const DEFAULT_JUDGES: usize = 3;

// ============================================================================
// FIGHT CONFIG
// ============================================================================

/// How the judging panel is chosen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeSelection {
    /// Draw `count` distinct profiles from the fight RNG
    Random { count: usize },
    /// Use exactly these judges in this order
    Panel(Vec<JudgeId>),
}

impl JudgeSelection {
    pub fn count(&self) -> usize {
        match self {
            JudgeSelection::Random { count } => *count,
            JudgeSelection::Panel(judges) => judges.len(),
        }
    }
}

impl Default for JudgeSelection {
    fn default() -> Self {
        JudgeSelection::Random {
            count: DEFAULT_JUDGES,
        }
    }
}

/// Configuration for one fight. The seed is required by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FightConfig {
    pub seed: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u8,
    #[serde(default)]
    pub judges: JudgeSelection,
    #[serde(default)]
    pub tuning: EngineTuning,
}

fn default_rounds() -> u8 {
    DEFAULT_ROUNDS
}

impl FightConfig {
    /// Three rounds, three random judges, calibrated tuning
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rounds: DEFAULT_ROUNDS,
            judges: JudgeSelection::default(),
            tuning: EngineTuning::default(),
        }
    }

    /// Schedule five rounds
    pub fn title_fight(mut self) -> Self {
        self.rounds = TITLE_ROUNDS;
        self
    }

    pub fn with_rounds(mut self, rounds: u8) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_judges(mut self, judges: JudgeSelection) -> Self {
        self.judges = judges;
        self
    }

    pub fn with_tuning(mut self, tuning: EngineTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_ROUNDS).contains(&self.rounds) {
            return Err(FightError::config(format!(
                "round count {} is outside 1-{}",
                self.rounds, MAX_ROUNDS
            )));
        }

        let count = self.judges.count();
        if !(1..=PANEL_SIZE).contains(&count) {
            return Err(FightError::config(format!(
                "judge count {count} is outside 1-{PANEL_SIZE}"
            )));
        }
        if let JudgeSelection::Panel(judges) = &self.judges {
            for (i, judge) in judges.iter().enumerate() {
                if judges[..i].contains(judge) {
                    return Err(FightError::config(format!("judge {judge:?} listed twice")));
                }
            }
        }

        self.tuning.validate()
    }
}

// ============================================================================
// MOMENTUM MODE
// ============================================================================

/// How momentum is kept inside [-1, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumMode {
    /// Add the shift, then clamp to the bounds
    #[default]
    HardClamp,
    /// Add the shift in atanh space so the bounds are approached asymptotically
    Saturating,
}

const SATURATION_LIMIT: f64 = 0.999_999;

impl MomentumMode {
    /// Apply a momentum shift
    pub fn shift(self, momentum: f64, delta: f64) -> f64 {
        match self {
            MomentumMode::HardClamp => (momentum + delta).clamp(-1.0, 1.0),
            MomentumMode::Saturating => {
                let m = momentum.clamp(-SATURATION_LIMIT, SATURATION_LIMIT);
                (m.atanh() + delta).tanh()
            }
        }
    }
}

// ============================================================================
// ENGINE TUNING
// ============================================================================

/// Calibrated engine constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    // Momentum
    pub momentum_mode: MomentumMode,
    /// Fraction of momentum lost every tick
    pub momentum_decay: f64,
    /// Damage lead needed in one tick to swing momentum
    pub momentum_swing_margin: f64,
    pub momentum_swing_gain: f64,
    pub momentum_swing_loss: f64,
    pub knockdown_momentum: f64,
    /// Per-tick drain after surviving a knockdown, until the round ends
    pub knockdown_penalty: f64,
    pub top_position_gain: f64,
    pub bottom_position_loss: f64,
    /// Swing on a clean submission escape
    pub escape_momentum: f64,

    // Striking
    pub strike_damage_min: f64,
    pub strike_damage_max: f64,
    pub clinch_damage_scale: f64,
    pub clinch_land_chance: f64,
    pub flash_damage: f64,

    // Knockdown thresholds
    pub hurt_base: f64,
    pub hurt_per_chin: f64,
    pub knockdown_ratio: f64,
    pub one_punch_ratio: f64,
    /// Ticks a fighter stays Hurt
    pub hurt_duration: u8,

    // Referee stoppage
    pub stoppage_base: f64,
    pub stoppage_damage: f64,
    pub stoppage_repeat: f64,
    pub stoppage_one_punch: f64,

    // Accumulated-damage finish
    pub strike_threshold_base: f64,
    pub strike_threshold_per_chin: f64,
    pub tko_ramp_start: f64,
    pub tko_scale: f64,
    pub tko_hurt_mult: f64,

    // Ground
    pub ground_stay: f64,
    pub ground_and_pound_chance: f64,
    pub ground_damage_min: f64,
    pub ground_damage_max: f64,
    pub submission_attempt_rate: f64,
    pub submission_attempt_rate_elite: f64,
    pub submission_damage_min: f64,
    pub submission_damage_max: f64,
    pub submission_threshold: f64,
    pub submission_ramp_start: f64,
    pub submission_scale: f64,
    pub submission_hurt_mult: f64,
    pub escape_floor: f64,

    // Stamina
    pub stamina_drain_min: f64,
    pub stamina_drain_max: f64,
    pub clinch_drain: f64,
    pub ground_drain: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            momentum_mode: MomentumMode::HardClamp,
            momentum_decay: 0.08,
            momentum_swing_margin: 4.0,
            momentum_swing_gain: 0.08,
            momentum_swing_loss: 0.06,
            knockdown_momentum: 0.30,
            knockdown_penalty: 0.04,
            top_position_gain: 0.10,
            bottom_position_loss: 0.05,
            escape_momentum: 0.10,

            strike_damage_min: 4.0,
            strike_damage_max: 14.0,
            clinch_damage_scale: 0.6,
            clinch_land_chance: 0.5,
            flash_damage: 8.0,

            hurt_base: 2.5,
            hurt_per_chin: 0.05,
            knockdown_ratio: 0.7,
            one_punch_ratio: 1.6,
            hurt_duration: 2,

            stoppage_base: 0.06,
            stoppage_damage: 0.38,
            stoppage_repeat: 0.30,
            stoppage_one_punch: 0.10,

            strike_threshold_base: 68.0,
            strike_threshold_per_chin: 0.8,
            tko_ramp_start: 0.9,
            tko_scale: 0.32,
            tko_hurt_mult: 1.3,

            ground_stay: 0.45,
            ground_and_pound_chance: 0.65,
            ground_damage_min: 6.0,
            ground_damage_max: 15.0,
            submission_attempt_rate: 0.18,
            submission_attempt_rate_elite: 0.26,
            submission_damage_min: 25.0,
            submission_damage_max: 40.0,
            submission_threshold: 70.0,
            submission_ramp_start: 0.5,
            submission_scale: 0.37,
            submission_hurt_mult: 1.2,
            escape_floor: 0.22,

            stamina_drain_min: 1.5,
            stamina_drain_max: 3.5,
            clinch_drain: 0.5,
            ground_drain: 1.0,
        }
    }
}

impl EngineTuning {
    /// Reject non-finite or out-of-range constants
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("momentum_decay", self.momentum_decay),
            ("clinch_land_chance", self.clinch_land_chance),
            ("ground_stay", self.ground_stay),
            ("ground_and_pound_chance", self.ground_and_pound_chance),
            ("submission_attempt_rate", self.submission_attempt_rate),
            ("submission_attempt_rate_elite", self.submission_attempt_rate_elite),
            ("escape_floor", self.escape_floor),
            ("stoppage_base", self.stoppage_base),
            ("tko_ramp_start", self.tko_ramp_start),
            ("submission_ramp_start", self.submission_ramp_start),
        ];
        for (name, value) in probabilities {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                let reason = format!("{name} = {value} must be in [0, 1]");
                return Err(FightError::config(reason));
            }
        }
        if self.tko_ramp_start >= 1.0 || self.submission_ramp_start >= 1.0 {
            return Err(FightError::config("finish ramps must start below 1.0"));
        }

        let non_negative = [
            ("momentum_swing_margin", self.momentum_swing_margin),
            ("momentum_swing_gain", self.momentum_swing_gain),
            ("momentum_swing_loss", self.momentum_swing_loss),
            ("knockdown_momentum", self.knockdown_momentum),
            ("knockdown_penalty", self.knockdown_penalty),
            ("top_position_gain", self.top_position_gain),
            ("bottom_position_loss", self.bottom_position_loss),
            ("escape_momentum", self.escape_momentum),
            ("clinch_damage_scale", self.clinch_damage_scale),
            ("flash_damage", self.flash_damage),
            ("hurt_base", self.hurt_base),
            ("hurt_per_chin", self.hurt_per_chin),
            ("knockdown_ratio", self.knockdown_ratio),
            ("one_punch_ratio", self.one_punch_ratio),
            ("stoppage_damage", self.stoppage_damage),
            ("stoppage_repeat", self.stoppage_repeat),
            ("stoppage_one_punch", self.stoppage_one_punch),
            ("strike_threshold_per_chin", self.strike_threshold_per_chin),
            ("tko_scale", self.tko_scale),
            ("tko_hurt_mult", self.tko_hurt_mult),
            ("submission_scale", self.submission_scale),
            ("submission_hurt_mult", self.submission_hurt_mult),
            ("clinch_drain", self.clinch_drain),
            ("ground_drain", self.ground_drain),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                let reason = format!("{name} = {value} must be non-negative");
                return Err(FightError::config(reason));
            }
        }

        let positive = [
            ("strike_threshold_base", self.strike_threshold_base),
            ("submission_threshold", self.submission_threshold),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                let reason = format!("{name} = {value} must be positive");
                return Err(FightError::config(reason));
            }
        }

        let ranges = [
            ("strike_damage", self.strike_damage_min, self.strike_damage_max),
            ("ground_damage", self.ground_damage_min, self.ground_damage_max),
            ("submission_damage", self.submission_damage_min, self.submission_damage_max),
            ("stamina_drain", self.stamina_drain_min, self.stamina_drain_max),
        ];
        for (name, lo, hi) in ranges {
            if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo >= hi {
                return Err(FightError::config(format!(
                    "{name} range [{lo}, {hi}) must be non-empty and non-negative"
                )));
            }
        }

        if self.hurt_duration == 0 {
            let reason = "hurt_duration must be at least one tick";
            return Err(FightError::config(reason));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FightConfig::new(42);
        assert_eq!(config.rounds, 3);
        assert_eq!(config.judges.count(), 3);
        assert!(config.validate().is_ok());
        assert_eq!(config.title_fight().rounds, 5);
    }

    #[test]
    fn test_round_bounds() {
        assert!(FightConfig::new(1).with_rounds(0).validate().is_err());
        assert!(FightConfig::new(1).with_rounds(6).validate().is_err());
        assert!(FightConfig::new(1).with_rounds(1).validate().is_ok());
    }

    #[test]
    fn test_judge_bounds() {
        let none = FightConfig::new(1).with_judges(JudgeSelection::Random { count: 0 });
        assert!(matches!(none.validate(), Err(FightError::Configuration(_))));

        let many = FightConfig::new(1).with_judges(JudgeSelection::Random { count: 6 });
        assert!(many.validate().is_err());

        let dup = FightConfig::new(1).with_judges(JudgeSelection::Panel(vec![
            JudgeId::Okafor,
            JudgeId::Okafor,
        ]));
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_tuning_validation() {
        let tuning = EngineTuning {
            momentum_decay: 1.5,
            ..EngineTuning::default()
        };
        assert!(tuning.validate().is_err());

        let tuning = EngineTuning {
            strike_damage_min: 14.0,
            strike_damage_max: 4.0,
            ..EngineTuning::default()
        };
        assert!(tuning.validate().is_err());

        let tuning = EngineTuning {
            tko_scale: f64::NAN,
            ..EngineTuning::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_partial_tuning_json() {
        let tuning: EngineTuning =
            serde_json::from_str(r#"{"momentum_mode": "saturating", "tko_scale": 0.4}"#).unwrap();
        assert_eq!(tuning.momentum_mode, MomentumMode::Saturating);
        assert_eq!(tuning.tko_scale, 0.4);
        assert_eq!(tuning.hurt_base, EngineTuning::default().hurt_base);
    }

    #[test]
    fn test_momentum_modes_stay_bounded() {
        assert_eq!(MomentumMode::HardClamp.shift(0.95, 0.3), 1.0);
        assert_eq!(MomentumMode::HardClamp.shift(-0.95, -0.3), -1.0);

        let mut m = 0.0;
        for _ in 0..100 {
            m = MomentumMode::Saturating.shift(m, 0.3);
            assert!(m < 1.0);
        }
        assert!(m > 0.99);
        let back = MomentumMode::Saturating.shift(0.2, 0.0);
        assert!((back - 0.2).abs() < 1e-12);
    }
}
