//! Realistic fighter sampling for calibration
//!
//! Level 3 - Step-level implementation

use fightsim_core::modifiers::{ALL_STYLES, ALL_TRAITS};
use fightsim_core::{Attributes, CutSeverity, FighterState, TraitSet};
use rand::seq::SliceRandom;
use rand::Rng;

/// Attribute range of a realistic roster fighter
pub const ATTRIBUTE_RANGE: std::ops::RangeInclusive<u8> = 40..=92;
/// Most traits a sampled fighter carries
pub const MAX_TRAITS: usize = 3;

/// Cut tiers with their relative frequency
const CUT_WEIGHTS: [(CutSeverity, u32); 5] = [
    (CutSeverity::None, 20),
    (CutSeverity::Easy, 35),
    (CutSeverity::Moderate, 25),
    (CutSeverity::Severe, 15),
    (CutSeverity::Extreme, 5),
];

/// Sample one realistic fighter
pub fn sample_fighter<R: Rng>(rng: &mut R, id: u64) -> FighterState {
    let mut roll = || rng.gen_range(ATTRIBUTE_RANGE);
    let attributes = Attributes {
        striking: roll(),
        grappling: roll(),
        wrestling: roll(),
        cardio: roll(),
        chin: roll(),
        speed: roll(),
    };
    let style = *ALL_STYLES.choose(rng).unwrap_or(&ALL_STYLES[3]);
    let traits = sample_traits(rng);
    let cut = sample_cut(rng);
    let confidence = rng.gen_range(30.0..80.0);

    FighterState::new(id, format!("Prospect {id}"), attributes, style)
        .with_traits(traits)
        .with_cut(cut)
        .with_confidence(confidence)
}

/// Up to three distinct traits, never a contradictory pair
pub fn sample_traits<R: Rng>(rng: &mut R) -> TraitSet {
    let count = rng.gen_range(0..=MAX_TRAITS);
    let mut set = TraitSet::empty();
    while set.len() < count {
        let t = ALL_TRAITS[rng.gen_range(0..ALL_TRAITS.len())];
        if set.contains(t) || set.contradicts(t) {
            continue;
        }
        set.insert(t);
    }
    set
}

fn sample_cut<R: Rng>(rng: &mut R) -> CutSeverity {
    let total: u32 = CUT_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut pick = rng.gen_range(0..total);
    for (tier, weight) in CUT_WEIGHTS {
        if pick < weight {
            return tier;
        }
        pick -= weight;
    }
    CutSeverity::None
}
