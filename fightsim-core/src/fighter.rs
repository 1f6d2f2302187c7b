//! Fighter snapshot consumed by the engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FightError, Result};
use crate::modifiers::{CutSeverity, Style, Trait, TraitSet};

/// Lowest legal attribute value
pub const ATTRIBUTE_MIN: u8 = 1;
/// Highest legal attribute value
pub const ATTRIBUTE_MAX: u8 = 100;

/// Corner of the cage. Fighter A is always Red.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Red,
    Blue,
}

impl Corner {
    pub const BOTH: [Corner; 2] = [Corner::Red, Corner::Blue];

    pub fn opponent(self) -> Corner {
        match self {
            Corner::Red => Corner::Blue,
            Corner::Blue => Corner::Red,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Corner::Red => 0,
            Corner::Blue => 1,
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::Red => write!(f, "red"),
            Corner::Blue => write!(f, "blue"),
        }
    }
}

/// The six rated attributes, each 1-100
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub striking: u8,
    pub grappling: u8,
    pub wrestling: u8,
    pub cardio: u8,
    pub chin: u8,
    pub speed: u8,
}

impl Attributes {
    /// Every attribute set to the same value
    pub fn uniform(value: u8) -> Self {
        Self {
            striking: value,
            grappling: value,
            wrestling: value,
            cardio: value,
            chin: value,
            speed: value,
        }
    }

    /// Named attribute values, in declaration order
    pub fn named(&self) -> [(&'static str, u8); 6] {
        [
            ("striking", self.striking),
            ("grappling", self.grappling),
            ("wrestling", self.wrestling),
            ("cardio", self.cardio),
            ("chin", self.chin),
            ("speed", self.speed),
        ]
    }

    fn validate(&self, corner: Corner) -> Result<()> {
        for (name, value) in self.named() {
            if !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value) {
                return Err(FightError::invalid(
                    corner,
                    format!("{name} = {value} is outside {ATTRIBUTE_MIN}-{ATTRIBUTE_MAX}"),
                ));
            }
        }
        Ok(())
    }
}

fn default_stamina() -> f64 {
    100.0
}

fn default_confidence() -> f64 {
    50.0
}

/// One competitor's attributes plus fight-night modifiers.
///
/// `hurt` and `knockdowns` describe in-fight state. They are carried so a
/// snapshot can be round-tripped, but every simulation starts its own copy
/// from Standing with zero knockdowns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterState {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub attributes: Attributes,
    pub style: Style,
    #[serde(default)]
    pub traits: TraitSet,
    #[serde(default)]
    pub momentum: f64,
    #[serde(default = "default_stamina")]
    pub stamina: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub cut: CutSeverity,
    #[serde(default)]
    pub hurt: bool,
    #[serde(default)]
    pub knockdowns: u32,
}

impl FighterState {
    /// Fresh fighter: full stamina, neutral momentum and confidence, no cut
    pub fn new(id: u64, name: impl Into<String>, attributes: Attributes, style: Style) -> Self {
        Self {
            id,
            name: name.into(),
            attributes,
            style,
            traits: TraitSet::empty(),
            momentum: 0.0,
            stamina: default_stamina(),
            confidence: default_confidence(),
            cut: CutSeverity::None,
            hurt: false,
            knockdowns: 0,
        }
    }

    pub fn with_traits(mut self, traits: TraitSet) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.insert(t);
        self
    }

    pub fn with_cut(mut self, cut: CutSeverity) -> Self {
        self.cut = cut;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_stamina(mut self, stamina: f64) -> Self {
        self.stamina = stamina;
        self
    }

    pub fn has(&self, t: Trait) -> bool {
        self.traits.contains(t)
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("#{}", self.id)
        } else {
            self.name.clone()
        }
    }

    /// Check every field against its declared range
    pub fn validate(&self, corner: Corner) -> Result<()> {
        self.attributes.validate(corner)?;

        check_range(corner, "stamina", self.stamina, 0.0, 100.0)?;
        check_range(corner, "momentum", self.momentum, -1.0, 1.0)?;
        check_range(corner, "confidence", self.confidence, 0.0, 100.0)?;

        if let Some((a, b)) = self.traits.contradiction() {
            return Err(FightError::invalid(
                corner,
                format!("traits {} and {} cannot be combined", a.label(), b.label()),
            ));
        }
        Ok(())
    }
}

fn check_range(corner: Corner, field: &str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if !value.is_finite() {
        let reason = format!("{field} is not finite");
        return Err(FightError::invalid(corner, reason));
    }
    if value < lo || value > hi {
        return Err(FightError::invalid(
            corner,
            format!("{field} = {value} is outside [{lo}, {hi}]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> FighterState {
        FighterState::new(1, "Test", Attributes::uniform(70), Style::WellRounded)
    }

    #[test]
    fn test_corner_basics() {
        assert_eq!(Corner::Red.opponent(), Corner::Blue);
        assert_eq!(Corner::Blue.index(), 1);
        assert_eq!(Corner::Red.to_string(), "red");
    }

    #[test]
    fn test_valid_fighter() {
        assert!(fighter().validate(Corner::Red).is_ok());
    }

    #[test]
    fn test_attribute_out_of_range() {
        let mut f = fighter();
        f.attributes.chin = 0;
        let err = f.validate(Corner::Blue).unwrap_err();
        match err {
            FightError::InvalidFighterState { corner, reason } => {
                assert_eq!(corner, Corner::Blue);
                assert!(reason.contains("chin"));
            }
            other => panic!("unexpected error: {other}"),
        }

        f.attributes.chin = 101;
        assert!(f.validate(Corner::Blue).is_err());
    }

    #[test]
    fn test_fight_night_bounds() {
        assert!(fighter().with_momentum(1.5).validate(Corner::Red).is_err());
        assert!(fighter().with_stamina(-1.0).validate(Corner::Red).is_err());
        let shaken = fighter().with_confidence(f64::NAN);
        assert!(shaken.validate(Corner::Red).is_err());
        assert!(fighter().with_momentum(-1.0).validate(Corner::Red).is_ok());
    }

    #[test]
    fn test_contradictory_traits_rejected() {
        let f = fighter()
            .with_trait(Trait::SlowStarter)
            .with_trait(Trait::FastHands);
        assert!(f.validate(Corner::Red).is_err());
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "id": 7,
            "attributes": {"striking": 80, "grappling": 60, "wrestling": 55,
                           "cardio": 70, "chin": 65, "speed": 75},
            "style": "Well-Rounded",
            "traits": ["iron_chin"],
            "cut": "moderate"
        }"#;
        let f: FighterState = serde_json::from_str(json).unwrap();
        assert_eq!(f.style, Style::WellRounded);
        assert!(f.has(Trait::IronChin));
        assert_eq!(f.cut, CutSeverity::Moderate);
        assert_eq!(f.stamina, 100.0);
        assert_eq!(f.confidence, 50.0);
        assert_eq!(f.display_name(), "#7");
    }
}
