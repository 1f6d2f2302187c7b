//! Confidence scaling
//!
//! Confidence is set before the fight and never changes during it.

/// Confidence with no effect on output
pub const NEUTRAL: f64 = 50.0;

const OUTPUT_SWING: f64 = 0.08;
const ESCAPE_SWING: f64 = 0.05;

fn deviation(confidence: f64) -> f64 {
    (confidence - NEUTRAL) / NEUTRAL
}

/// Damage output multiplier (0.92 at 0, 1.08 at 100)
pub fn output_factor(confidence: f64) -> f64 {
    1.0 + deviation(confidence) * OUTPUT_SWING
}

/// Submission escape multiplier (0.95 at 0, 1.05 at 100)
pub fn escape_factor(confidence: f64) -> f64 {
    1.0 + deviation(confidence) * ESCAPE_SWING
}
