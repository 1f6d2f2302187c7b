//! Configuration types for batch play
//!
//! Level 4 - Utilities and configuration

use fightsim_core::config::DEFAULT_JUDGES;
use fightsim_core::{EngineTuning, FightConfig, JudgeSelection};

/// Share of sampled bouts scheduled as five-round title fights
pub const DEFAULT_TITLE_RATE: f64 = 0.10;

/// Calibration run over randomly sampled realistic matchups
#[derive(Clone, Debug)]
pub struct CalibrationConfig {
    /// Number of fights to simulate
    pub fights: usize,
    /// Seed for roster sampling; fight `i` uses `base_seed + i`
    pub base_seed: u64,
    /// Whether to run fights in parallel
    pub parallel: bool,
    /// Probability a sampled bout is a title fight
    pub title_rate: f64,
    /// Judges per fight
    pub judges: usize,
    /// Engine constants under test
    pub tuning: EngineTuning,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            fights: 2000,
            base_seed: 42,
            parallel: true,
            title_rate: DEFAULT_TITLE_RATE,
            judges: DEFAULT_JUDGES,
            tuning: EngineTuning::default(),
        }
    }
}

impl CalibrationConfig {
    /// Create config for the given number of fights
    pub fn new(fights: usize) -> Self {
        Self {
            fights,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_tuning(mut self, tuning: EngineTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Fight config for bout `index`
    pub(crate) fn fight_config(&self, index: usize, title: bool) -> FightConfig {
        let config = FightConfig::new(self.base_seed.wrapping_add(index as u64))
            .with_judges(JudgeSelection::Random { count: self.judges })
            .with_tuning(self.tuning.clone());
        if title {
            config.title_fight()
        } else {
            config
        }
    }
}

/// Head-to-head series between two fixed fighters
#[derive(Clone, Debug)]
pub struct SeriesConfig {
    /// Number of fights (should be even for corner alternation)
    pub fights: usize,
    /// Fight `i` uses `base_seed + i`
    pub base_seed: u64,
    /// Whether to run fights in parallel
    pub parallel: bool,
    pub rounds: u8,
    pub tuning: EngineTuning,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            fights: 100,
            base_seed: 42,
            parallel: true,
            rounds: fightsim_core::config::DEFAULT_ROUNDS,
            tuning: EngineTuning::default(),
        }
    }
}

impl SeriesConfig {
    /// Create config with specified number of fights
    pub fn new(fights: usize) -> Self {
        Self {
            fights,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_rounds(mut self, rounds: u8) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_tuning(mut self, tuning: EngineTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub(crate) fn fight_config(&self, index: usize) -> FightConfig {
        FightConfig::new(self.base_seed.wrapping_add(index as u64))
            .with_rounds(self.rounds)
            .with_tuning(self.tuning.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_defaults() {
        let config = CalibrationConfig::default();
        assert_eq!(config.fights, 2000);
        assert!(config.parallel);
        assert_eq!(config.judges, 3);
    }

    #[test]
    fn test_fight_seeds_offset_from_base() {
        let config = CalibrationConfig::new(10).with_seed(100);
        assert_eq!(config.fight_config(0, false).seed, 100);
        assert_eq!(config.fight_config(7, true).seed, 107);
        assert_eq!(config.fight_config(7, true).rounds, 5);

        let wrap = CalibrationConfig::new(1).with_seed(u64::MAX);
        assert_eq!(wrap.fight_config(1, false).seed, 0);
    }

    #[test]
    fn test_series_config() {
        let config = SeriesConfig::new(8).with_rounds(5).with_seed(3);
        let fc = config.fight_config(2);
        assert_eq!((fc.seed, fc.rounds), (5, 5));
    }
}
