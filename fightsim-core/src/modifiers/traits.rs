//! Trait catalog and coefficient table
//!
//! Each trait maps to exactly one [`TraitCoefficients`] record. A fighter's
//! trait set is folded once per fight into a [`TraitProfile`], which the tick
//! loop and finish evaluator read at fixed extension points.

use serde::{Deserialize, Serialize};

// ============================================================================
// TRAIT CATALOG
// ============================================================================

/// Permanent fighter trait
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    IronChin,
    GasTank,
    SlowStarter,
    PressureFighter,
    SubmissionMagnet,
    KnockoutArtist,
    MediaDarling,
    JourneymanHeart,
    FastHands,
    GroundAndPoundSpecialist,
    ComebackKing,
    VeteranIq,
}

/// All traits in catalog order
pub const ALL_TRAITS: [Trait; 12] = [
    Trait::IronChin,
    Trait::GasTank,
    Trait::SlowStarter,
    Trait::PressureFighter,
    Trait::SubmissionMagnet,
    Trait::KnockoutArtist,
    Trait::MediaDarling,
    Trait::JourneymanHeart,
    Trait::FastHands,
    Trait::GroundAndPoundSpecialist,
    Trait::ComebackKing,
    Trait::VeteranIq,
];

/// Trait pairs that may not appear on the same fighter
pub const CONTRADICTIONS: [(Trait, Trait); 1] = [(Trait::SlowStarter, Trait::FastHands)];

impl Trait {
    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Trait::IronChin => "Iron Chin",
            Trait::GasTank => "Gas Tank",
            Trait::SlowStarter => "Slow Starter",
            Trait::PressureFighter => "Pressure Fighter",
            Trait::SubmissionMagnet => "Submission Magnet",
            Trait::KnockoutArtist => "Knockout Artist",
            Trait::MediaDarling => "Media Darling",
            Trait::JourneymanHeart => "Journeyman Heart",
            Trait::FastHands => "Fast Hands",
            Trait::GroundAndPoundSpecialist => "Ground & Pound",
            Trait::ComebackKing => "Comeback King",
            Trait::VeteranIq => "Veteran IQ",
        }
    }

    /// Coefficient record for this trait
    pub fn coefficients(self) -> TraitCoefficients {
        let base = TraitCoefficients::NEUTRAL;
        match self {
            Trait::IronChin => TraitCoefficients {
                strike_threshold_flat: 8.0,
                strike_threshold_mult: 1.12,
                hurt_threshold_bonus: 2.0,
                ..base
            },
            Trait::GasTank => TraitCoefficients {
                stamina_drain_mult: 0.55,
                recovery_bonus: 5.0,
                ignores_cardio_ceiling: true,
                ..base
            },
            Trait::SlowStarter => TraitCoefficients {
                opening_round_output: 0.85,
                late_round_output: 1.08,
                late_damage_mult: 1.05,
                ..base
            },
            Trait::PressureFighter => TraitCoefficients {
                pressure: true,
                ..base
            },
            Trait::SubmissionMagnet => TraitCoefficients {
                ground_damage_taken_mult: 1.2,
                escape_mult: 0.8,
                submission_threshold_override: Some(55.0),
                ..base
            },
            Trait::KnockoutArtist => TraitCoefficients {
                one_punch_bonus: 0.05,
                flash_chance: 0.04,
                ..base
            },
            // Hype and popularity only; no in-fight effect.
            Trait::MediaDarling => base,
            Trait::JourneymanHeart => TraitCoefficients {
                strike_threshold_mult: 1.2,
                strike_threshold_floor: 66.0,
                ..base
            },
            Trait::FastHands => TraitCoefficients {
                speed_bonus: 8.0,
                hit_bonus: 0.08,
                ..base
            },
            Trait::GroundAndPoundSpecialist => TraitCoefficients {
                ground_and_pound_mult: 1.25,
                ..base
            },
            Trait::ComebackKing => TraitCoefficients {
                strike_threshold_flat: 5.0,
                hurt_threshold_bonus: 1.0,
                comeback_mult: 1.2,
                ..base
            },
            Trait::VeteranIq => TraitCoefficients {
                late_flat_bonus: 4.0,
                late_drain_mult: 0.9,
                ..base
            },
        }
    }
}

// ============================================================================
// TRAIT SET
// ============================================================================

/// Set of traits held by one fighter (bitmask, catalog-ordered iteration)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Trait>", into = "Vec<Trait>")]
pub struct TraitSet {
    bits: u16,
}

impl TraitSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, t: Trait) -> Self {
        self.insert(t);
        self
    }

    pub fn insert(&mut self, t: Trait) {
        self.bits |= t.bit();
    }

    pub fn contains(&self, t: Trait) -> bool {
        self.bits & t.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Trait> + '_ {
        ALL_TRAITS.iter().copied().filter(|t| self.contains(*t))
    }

    /// First contradictory pair present in the set, if any
    pub fn contradiction(&self) -> Option<(Trait, Trait)> {
        CONTRADICTIONS
            .iter()
            .copied()
            .find(|&(a, b)| self.contains(a) && self.contains(b))
    }

    /// Whether adding `t` would create a contradiction
    pub fn contradicts(&self, t: Trait) -> bool {
        self.with(t).contradiction().is_some()
    }
}

impl From<Vec<Trait>> for TraitSet {
    fn from(traits: Vec<Trait>) -> Self {
        traits.into_iter().collect()
    }
}

impl From<TraitSet> for Vec<Trait> {
    fn from(set: TraitSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Trait> for TraitSet {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        let mut set = TraitSet::empty();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

// ============================================================================
// COEFFICIENTS
// ============================================================================

/// Coefficients one trait contributes at each extension point.
///
/// Multipliers are neutral at 1.0, additive terms at 0.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraitCoefficients {
    /// Added to the accumulated-strike finish threshold
    pub strike_threshold_flat: f64,
    /// Multiplies the finish threshold after the flat term
    pub strike_threshold_mult: f64,
    /// Lower bound on the finish threshold
    pub strike_threshold_floor: f64,
    /// Added to the hurt threshold (and the derived knockdown thresholds)
    pub hurt_threshold_bonus: f64,
    pub stamina_drain_mult: f64,
    /// Drain multiplier from round 3 on
    pub late_drain_mult: f64,
    pub recovery_bonus: f64,
    pub ignores_cardio_ceiling: bool,
    /// Striking/wrestling multiplier in round 1
    pub opening_round_output: f64,
    /// Striking/wrestling multiplier from round 3 on
    pub late_round_output: f64,
    /// Damage multiplier from round 3 on
    pub late_damage_mult: f64,
    /// Flat attribute bonus from round 3 on
    pub late_flat_bonus: f64,
    /// Extra output against a tiring opponent
    pub pressure: bool,
    /// Damage multiplier once 25 strike damage has been absorbed
    pub comeback_mult: f64,
    pub ground_damage_taken_mult: f64,
    pub escape_mult: f64,
    pub submission_threshold_override: Option<f64>,
    pub one_punch_bonus: f64,
    /// Per-landed-strike chance of a flash impact
    pub flash_chance: f64,
    pub speed_bonus: f64,
    pub hit_bonus: f64,
    pub ground_and_pound_mult: f64,
}

impl TraitCoefficients {
    pub const NEUTRAL: TraitCoefficients = TraitCoefficients {
        strike_threshold_flat: 0.0,
        strike_threshold_mult: 1.0,
        strike_threshold_floor: 0.0,
        hurt_threshold_bonus: 0.0,
        stamina_drain_mult: 1.0,
        late_drain_mult: 1.0,
        recovery_bonus: 0.0,
        ignores_cardio_ceiling: false,
        opening_round_output: 1.0,
        late_round_output: 1.0,
        late_damage_mult: 1.0,
        late_flat_bonus: 0.0,
        pressure: false,
        comeback_mult: 1.0,
        ground_damage_taken_mult: 1.0,
        escape_mult: 1.0,
        submission_threshold_override: None,
        one_punch_bonus: 0.0,
        flash_chance: 0.0,
        speed_bonus: 0.0,
        hit_bonus: 0.0,
        ground_and_pound_mult: 1.0,
    };

    /// Combine two records: flats add, multipliers multiply, floors take the max
    fn fold(self, other: TraitCoefficients) -> TraitCoefficients {
        TraitCoefficients {
            strike_threshold_flat: self.strike_threshold_flat + other.strike_threshold_flat,
            strike_threshold_mult: self.strike_threshold_mult * other.strike_threshold_mult,
            strike_threshold_floor: self
                .strike_threshold_floor
                .max(other.strike_threshold_floor),
            hurt_threshold_bonus: self.hurt_threshold_bonus + other.hurt_threshold_bonus,
            stamina_drain_mult: self.stamina_drain_mult * other.stamina_drain_mult,
            late_drain_mult: self.late_drain_mult * other.late_drain_mult,
            recovery_bonus: self.recovery_bonus + other.recovery_bonus,
            ignores_cardio_ceiling: self.ignores_cardio_ceiling || other.ignores_cardio_ceiling,
            opening_round_output: self.opening_round_output * other.opening_round_output,
            late_round_output: self.late_round_output * other.late_round_output,
            late_damage_mult: self.late_damage_mult * other.late_damage_mult,
            late_flat_bonus: self.late_flat_bonus + other.late_flat_bonus,
            pressure: self.pressure || other.pressure,
            comeback_mult: self.comeback_mult * other.comeback_mult,
            ground_damage_taken_mult: self.ground_damage_taken_mult
                * other.ground_damage_taken_mult,
            escape_mult: self.escape_mult * other.escape_mult,
            submission_threshold_override: match (
                self.submission_threshold_override,
                other.submission_threshold_override,
            ) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
            one_punch_bonus: self.one_punch_bonus + other.one_punch_bonus,
            flash_chance: self.flash_chance + other.flash_chance,
            speed_bonus: self.speed_bonus + other.speed_bonus,
            hit_bonus: self.hit_bonus + other.hit_bonus,
            ground_and_pound_mult: self.ground_and_pound_mult * other.ground_and_pound_mult,
        }
    }
}

/// A fighter's folded trait coefficients, computed once per fight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraitProfile {
    pub coefficients: TraitCoefficients,
}

impl TraitProfile {
    pub fn from_set(set: &TraitSet) -> Self {
        let coefficients = set
            .iter()
            .map(Trait::coefficients)
            .fold(TraitCoefficients::NEUTRAL, TraitCoefficients::fold);
        Self { coefficients }
    }

    /// Attribute output multiplier for the given round (striking and wrestling)
    pub fn round_output(&self, round: u8) -> f64 {
        match round {
            1 => self.coefficients.opening_round_output,
            2 => 1.0,
            _ => self.coefficients.late_round_output,
        }
    }

    /// Flat attribute bonus for the given round
    pub fn flat_bonus(&self, round: u8) -> f64 {
        if round >= 3 {
            self.coefficients.late_flat_bonus
        } else {
            0.0
        }
    }

    /// Stamina drain multiplier for the given round
    pub fn drain_mult(&self, round: u8) -> f64 {
        let late = if round >= 3 {
            self.coefficients.late_drain_mult
        } else {
            1.0
        };
        self.coefficients.stamina_drain_mult * late
    }

    /// Apply the trait adjustments to a base accumulated-strike threshold
    pub fn strike_threshold(&self, base: f64) -> f64 {
        let c = &self.coefficients;
        ((base + c.strike_threshold_flat) * c.strike_threshold_mult).max(c.strike_threshold_floor)
    }
}

impl Default for TraitProfile {
    fn default() -> Self {
        Self {
            coefficients: TraitCoefficients::NEUTRAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_set_roundtrip_order() {
        let set: TraitSet = vec![Trait::VeteranIq, Trait::IronChin, Trait::IronChin].into();
        assert_eq!(set.len(), 2);
        let list: Vec<Trait> = set.into();
        assert_eq!(list, vec![Trait::IronChin, Trait::VeteranIq]);
    }

    #[test]
    fn test_contradiction_detected() {
        let fast = TraitSet::empty().with(Trait::FastHands);
        let set = fast.with(Trait::SlowStarter);
        let pair = Some((Trait::SlowStarter, Trait::FastHands));
        assert_eq!(set.contradiction(), pair);
        assert!(fast.contradicts(Trait::SlowStarter));
        let iron = TraitSet::empty().with(Trait::IronChin);
        assert!(!iron.contradicts(Trait::GasTank));
    }

    #[test]
    fn test_serde_names() {
        let set = TraitSet::empty()
            .with(Trait::GroundAndPoundSpecialist)
            .with(Trait::IronChin);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["iron_chin","ground_and_pound_specialist"]"#);
        let back: TraitSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_iron_chin_raises_threshold() {
        let plain = TraitProfile::default();
        let iron = TraitProfile::from_set(&TraitSet::empty().with(Trait::IronChin));
        // (68 + 8) * 1.12
        assert!((iron.strike_threshold(68.0) - 85.12).abs() < 1e-9);
        assert!(iron.strike_threshold(68.0) > plain.strike_threshold(68.0));
    }

    #[test]
    fn test_journeyman_floor() {
        let heart = TraitProfile::from_set(&TraitSet::empty().with(Trait::JourneymanHeart));
        assert_eq!(heart.strike_threshold(30.0), 66.0);
        assert!((heart.strike_threshold(70.0) - 84.0).abs() < 1e-9);
    }

    #[test]
    fn test_media_darling_is_neutral() {
        let profile = TraitProfile::from_set(&TraitSet::empty().with(Trait::MediaDarling));
        assert_eq!(profile, TraitProfile::default());
    }

    #[test]
    fn test_round_scaled_effects() {
        let slow = TraitProfile::from_set(&TraitSet::empty().with(Trait::SlowStarter));
        assert_eq!(slow.round_output(1), 0.85);
        assert_eq!(slow.round_output(2), 1.0);
        assert_eq!(slow.round_output(4), 1.08);

        let set = TraitSet::empty()
            .with(Trait::VeteranIq)
            .with(Trait::GasTank);
        let vet = TraitProfile::from_set(&set);
        assert_eq!(vet.flat_bonus(2), 0.0);
        assert_eq!(vet.flat_bonus(3), 4.0);
        assert!((vet.drain_mult(3) - 0.495).abs() < 1e-9);
    }
}
