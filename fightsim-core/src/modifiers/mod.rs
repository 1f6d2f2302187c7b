//! Modifier tables: traits, style matchup, weight cut, confidence
//!
//! Pure lookup data. Nothing here touches the RNG or fight state.

pub mod confidence;
pub mod cut;
pub mod style;
pub mod traits;

pub use cut::{CutPenalty, CutSeverity};
pub use style::{Style, StyleMatchup, ALL_STYLES};
pub use traits::{Trait, TraitCoefficients, TraitProfile, TraitSet, ALL_TRAITS};
