//! Finish probability evaluation
//!
//! Pure functions of fight state. The tick loop supplies the numbers and the
//! rolls; strike finishes are then routed through the knockdown machine.

use crate::config::EngineTuning;
use crate::modifiers::{confidence, Style, TraitProfile};

/// Attacker momentum above this lowers the defender's thresholds
const MOMENTUM_EDGE: f64 = 0.5;
const PROBABILITY_CAP: f64 = 0.95;

/// Per-tick KO/TKO and submission probabilities
#[derive(Clone, Debug)]
pub struct FinishEvaluator {
    tuning: EngineTuning,
}

impl FinishEvaluator {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self {
            tuning: tuning.clone(),
        }
    }

    /// Accumulated strike damage a fighter can absorb before finish risk ramps up
    pub fn strike_threshold(
        &self,
        chin: f64,
        profile: &TraitProfile,
        opponent_momentum: f64,
    ) -> f64 {
        let base = self.tuning.strike_threshold_base
            + (chin - 50.0) * self.tuning.strike_threshold_per_chin;
        profile.strike_threshold(base) * momentum_scale(opponent_momentum)
    }

    /// Chance accumulated damage drops the fighter this tick
    pub fn accumulated_finish_probability(&self, damage: f64, threshold: f64, hurt: bool) -> f64 {
        let start = self.tuning.tko_ramp_start;
        let ramp = ((damage / threshold - start) / (1.0 - start)).max(0.0);
        let mut p = (ramp * ramp * self.tuning.tko_scale).min(PROBABILITY_CAP);
        if hurt {
            p = (p * self.tuning.tko_hurt_mult).min(PROBABILITY_CAP);
        }
        p
    }

    /// Referee stoppage chance on entering Down
    pub fn stoppage_probability(
        &self,
        damage: f64,
        threshold: f64,
        round_knockdowns: u32,
        one_punch: bool,
    ) -> f64 {
        let t = &self.tuning;
        let ratio = (damage / threshold).min(1.0);
        let repeat = round_knockdowns.saturating_sub(1) as f64;
        let power = if one_punch { t.stoppage_one_punch } else { 0.0 };
        (t.stoppage_base + t.stoppage_damage * ratio + t.stoppage_repeat * repeat + power)
            .min(PROBABILITY_CAP)
    }

    /// Chance the top fighter attempts a submission this tick
    pub fn submission_attempt_rate(&self, effective_grappling: f64) -> f64 {
        if effective_grappling > 80.0 {
            self.tuning.submission_attempt_rate_elite
        } else {
            self.tuning.submission_attempt_rate
        }
    }

    /// Chance the defender escapes an attempt; half of it is a clean escape
    pub fn escape_chance(&self, grappling: f64, wrestling: f64, defender: &EscapeContext) -> f64 {
        let mut esc = ((grappling * 0.7 + wrestling * 0.3) / 180.0).max(self.tuning.escape_floor);
        if defender.hurt {
            esc *= 0.7;
        }
        esc *= defender.profile.coefficients.escape_mult;
        if defender.style == Style::WellRounded {
            esc *= 1.15;
        }
        esc * confidence::escape_factor(defender.confidence)
    }

    /// Grappling damage at which a submission becomes likely
    pub fn submission_threshold(&self, defender: &TraitProfile, attacker_momentum: f64) -> f64 {
        let base = defender
            .coefficients
            .submission_threshold_override
            .unwrap_or(self.tuning.submission_threshold);
        base * momentum_scale(attacker_momentum)
    }

    /// Chance a non-escaped attempt ends the fight
    pub fn submission_probability(&self, damage: f64, threshold: f64, hurt: bool) -> f64 {
        let start = self.tuning.submission_ramp_start;
        let ramp = ((damage / threshold - start) / (1.0 - start)).max(0.0);
        let mut p = (ramp * self.tuning.submission_scale).min(PROBABILITY_CAP);
        if hurt {
            p = (p * self.tuning.submission_hurt_mult).min(PROBABILITY_CAP);
        }
        p
    }
}

/// Defender-side inputs to the escape roll
#[derive(Clone, Copy, Debug)]
pub struct EscapeContext<'a> {
    pub hurt: bool,
    pub style: Style,
    pub confidence: f64,
    pub profile: &'a TraitProfile,
}

fn momentum_scale(momentum: f64) -> f64 {
    if momentum > MOMENTUM_EDGE {
        0.9
    } else if momentum < -MOMENTUM_EDGE {
        1.1
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{Trait, TraitSet};

    fn evaluator() -> FinishEvaluator {
        FinishEvaluator::new(&EngineTuning::default())
    }

    #[test]
    fn test_strike_threshold_from_chin() {
        let e = evaluator();
        let plain = TraitProfile::default();
        assert!((e.strike_threshold(50.0, &plain, 0.0) - 68.0).abs() < 1e-9);
        assert!((e.strike_threshold(70.0, &plain, 0.0) - 84.0).abs() < 1e-9);
        let neutral = e.strike_threshold(70.0, &plain, 0.0);
        assert!(e.strike_threshold(70.0, &plain, 0.8) < neutral);
        assert!(e.strike_threshold(70.0, &plain, -0.8) > neutral);
    }

    #[test]
    fn test_iron_chin_threshold_higher() {
        let e = evaluator();
        let iron = TraitProfile::from_set(&TraitSet::empty().with(Trait::IronChin));
        let plain = TraitProfile::default();
        let with = e.strike_threshold(60.0, &iron, 0.0);
        assert!(with > e.strike_threshold(60.0, &plain, 0.0));
    }

    #[test]
    fn test_accumulated_ramp() {
        let e = evaluator();
        assert_eq!(e.accumulated_finish_probability(80.0, 100.0, false), 0.0);
        assert_eq!(e.accumulated_finish_probability(90.0, 100.0, false), 0.0);
        let at = e.accumulated_finish_probability(100.0, 100.0, false);
        assert!((at - 0.32).abs() < 1e-9);
        let hurt = e.accumulated_finish_probability(100.0, 100.0, true);
        assert!(hurt > at);
        assert_eq!(e.accumulated_finish_probability(1000.0, 100.0, true), 0.95);
    }

    #[test]
    fn test_stoppage_grows_with_repeat_knockdowns() {
        let e = evaluator();
        let first = e.stoppage_probability(30.0, 80.0, 1, false);
        let second = e.stoppage_probability(30.0, 80.0, 2, false);
        assert!(second > first);
        assert!(e.stoppage_probability(30.0, 80.0, 1, true) > first);
        assert_eq!(e.stoppage_probability(500.0, 80.0, 5, true), 0.95);
    }

    #[test]
    fn test_submission_probability() {
        let e = evaluator();
        let plain = TraitProfile::default();
        let magnet = TraitProfile::from_set(&TraitSet::empty().with(Trait::SubmissionMagnet));
        assert_eq!(e.submission_threshold(&plain, 0.0), 70.0);
        assert_eq!(e.submission_threshold(&magnet, 0.0), 55.0);

        assert_eq!(e.submission_probability(30.0, 70.0, false), 0.0);
        let p = e.submission_probability(70.0, 70.0, false);
        assert!((p - 0.37).abs() < 1e-9);
        assert!(e.submission_probability(70.0, 70.0, true) > p);
    }

    #[test]
    fn test_escape_chance_modifiers() {
        let e = evaluator();
        let plain = TraitProfile::default();
        let ctx = EscapeContext {
            hurt: false,
            style: Style::Striker,
            confidence: 50.0,
            profile: &plain,
        };
        let base = e.escape_chance(10.0, 10.0, &ctx);
        assert!((base - 0.22).abs() < 1e-9);

        let hurt = EscapeContext { hurt: true, ..ctx };
        assert!(e.escape_chance(10.0, 10.0, &hurt) < base);

        let rounded = EscapeContext {
            style: Style::WellRounded,
            ..ctx
        };
        assert!(e.escape_chance(10.0, 10.0, &rounded) > base);
    }
}
