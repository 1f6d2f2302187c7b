//! Weight-cut severity tiers
//!
//! The tier is computed upstream; the engine only applies its penalties.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutSeverity {
    #[default]
    None,
    Easy,
    Moderate,
    Severe,
    Extreme,
}

/// Penalties for one severity tier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutPenalty {
    /// Added to starting stamina
    pub stamina: f64,
    /// Added to chin (effective chin never drops below 1)
    pub chin: i32,
    /// Damage output multiplier
    pub output: f64,
}

impl CutSeverity {
    pub fn penalty(self) -> CutPenalty {
        let (stamina, chin, output) = match self {
            CutSeverity::None | CutSeverity::Easy => (0.0, 0, 1.0),
            CutSeverity::Moderate => (-3.0, -2, 0.98),
            CutSeverity::Severe => (-7.0, -5, 0.95),
            CutSeverity::Extreme => (-12.0, -8, 0.92),
        };
        CutPenalty {
            stamina,
            chin,
            output,
        }
    }

    /// Chin after the cut penalty
    pub fn effective_chin(self, chin: u8) -> f64 {
        (chin as i32 + self.penalty().chin).max(1) as f64
    }
}
