//! Method distributions and tolerance bands
//!
//! Level 4 - Utilities

use fightsim_core::Method;
use rustc_hash::FxHashMap;

/// Coarse outcome class used for calibration targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodClass {
    /// KO, TKO and double-knockdown TKO
    Strike,
    Submission,
    Decision,
}

impl MethodClass {
    pub fn of(method: Method) -> Self {
        if method.is_decision() {
            MethodClass::Decision
        } else if method == Method::Submission {
            MethodClass::Submission
        } else {
            MethodClass::Strike
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MethodClass::Strike => "KO/TKO",
            MethodClass::Submission => "Submission",
            MethodClass::Decision => "Decision",
        }
    }
}

/// Counts of each finish method
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MethodDistribution {
    counts: FxHashMap<Method, u32>,
    total: u32,
}

impl MethodDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, method: Method) {
        *self.counts.entry(method).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn count(&self, method: Method) -> u32 {
        self.counts.get(&method).copied().unwrap_or(0)
    }

    pub fn class_count(&self, class: MethodClass) -> u32 {
        self.counts
            .iter()
            .filter(|(m, _)| MethodClass::of(**m) == class)
            .map(|(_, c)| *c)
            .sum()
    }

    /// Fraction of fights ending by `method`
    pub fn fraction(&self, method: Method) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(method) as f64 / self.total as f64
        }
    }

    /// Fraction of fights in `class`
    pub fn class_fraction(&self, class: MethodClass) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.class_count(class) as f64 / self.total as f64
        }
    }

    /// Combine two distributions
    pub fn combine(&self, other: &MethodDistribution) -> MethodDistribution {
        let mut out = self.clone();
        for (method, count) in &other.counts {
            *out.counts.entry(*method).or_insert(0) += count;
        }
        out.total += other.total;
        out
    }

    /// Non-zero method counts in a stable display order
    pub fn entries(&self) -> Vec<(Method, u32)> {
        ALL_METHODS
            .iter()
            .map(|m| (*m, self.count(*m)))
            .filter(|(_, c)| *c > 0)
            .collect()
    }
}

impl FromIterator<Method> for MethodDistribution {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut dist = MethodDistribution::new();
        for m in iter {
            dist.record(m);
        }
        dist
    }
}

const ALL_METHODS: [Method; 7] = [
    Method::Ko,
    Method::Tko,
    Method::DoubleKnockdownTko,
    Method::Submission,
    Method::DecisionUnanimous,
    Method::DecisionMajority,
    Method::DecisionSplit,
];

/// Target class fractions with a symmetric band
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub strike: f64,
    pub submission: f64,
    pub decision: f64,
    /// Allowed absolute deviation from each target
    pub band: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            strike: 0.32,
            submission: 0.23,
            decision: 0.45,
            band: 0.06,
        }
    }
}

/// One class outside its band
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandViolation {
    pub class: MethodClass,
    pub target: f64,
    pub actual: f64,
}

impl Tolerance {
    pub fn with_band(mut self, band: f64) -> Self {
        self.band = band;
        self
    }

    pub fn target(&self, class: MethodClass) -> f64 {
        match class {
            MethodClass::Strike => self.strike,
            MethodClass::Submission => self.submission,
            MethodClass::Decision => self.decision,
        }
    }

    /// Classes whose observed fraction falls outside the band
    pub fn violations(&self, dist: &MethodDistribution) -> Vec<BandViolation> {
        [MethodClass::Strike, MethodClass::Submission, MethodClass::Decision]
            .into_iter()
            .filter_map(|class| {
                let target = self.target(class);
                let actual = dist.class_fraction(class);
                ((actual - target).abs() > self.band).then_some(BandViolation {
                    class,
                    target,
                    actual,
                })
            })
            .collect()
    }

    pub fn within_bands(&self, dist: &MethodDistribution) -> bool {
        self.violations(dist).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(strike: u32, sub: u32, dec: u32) -> MethodDistribution {
        let mut d = MethodDistribution::new();
        (0..strike).for_each(|_| d.record(Method::Tko));
        (0..sub).for_each(|_| d.record(Method::Submission));
        (0..dec).for_each(|_| d.record(Method::DecisionUnanimous));
        d
    }

    #[test]
    fn test_class_mapping() {
        let class = MethodClass::of;
        assert_eq!(class(Method::DoubleKnockdownTko), MethodClass::Strike);
        assert_eq!(class(Method::DecisionSplit), MethodClass::Decision);
        assert_eq!(class(Method::Submission), MethodClass::Submission);
    }

    #[test]
    fn test_fractions() {
        let d = dist(32, 23, 45);
        assert_eq!(d.total(), 100);
        assert!((d.class_fraction(MethodClass::Strike) - 0.32).abs() < 1e-12);
        assert_eq!(MethodDistribution::new().fraction(Method::Ko), 0.0);
    }

    #[test]
    fn test_within_bands() {
        let tol = Tolerance::default();
        assert!(tol.within_bands(&dist(32, 23, 45)));
        let bad = dist(10, 60, 30);
        let v = tol.violations(&bad);
        assert_eq!(v.len(), 3);
        assert!(!tol.within_bands(&bad));
    }

    #[test]
    fn test_combine() {
        let a = dist(1, 2, 3);
        let b = dist(3, 2, 1);
        let c = a.combine(&b);
        assert_eq!(c.total(), 12);
        assert_eq!(c.count(Method::Submission), 4);
        assert_eq!(c.entries().len(), 3);
    }
}
