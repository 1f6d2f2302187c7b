//! FightSim core - deterministic MMA fight resolution
//!
//! Resolves a bout between two fighter snapshots into a finish method, round,
//! time, scorecards and a tick-by-tick event log.
//!
//! ## Components
//!
//! - `fighter`: FighterState snapshot and validation
//! - `modifiers`: trait, style, weight-cut and confidence tables
//! - `knockdown`: explicit knockdown state machine
//! - `finish`: KO/TKO and submission probabilities
//! - `tick`: round and tick loop
//! - `judges`: five judge profiles and decision rules
//! - `orchestrator`: [`simulate`]
//!
//! Every call owns its own seeded RNG, so fights can run on any number of
//! threads without coordination.

pub mod config;
pub mod error;
pub mod fighter;
pub mod finish;
pub mod judges;
pub mod knockdown;
pub mod modifiers;
pub mod orchestrator;
pub mod result;
pub mod tick;

pub use config::{EngineTuning, FightConfig, JudgeSelection, MomentumMode};
pub use error::{FightError, Result};
pub use fighter::{Attributes, Corner, FighterState};
pub use judges::{Decision, DecisionKind, JudgeId, JudgeScorecard, RoundScorecard};
pub use knockdown::{KnockdownState, KnockdownStateMachine, Transition, TransitionCause};
pub use modifiers::{CutSeverity, Style, Trait, TraitSet};
pub use orchestrator::{simulate, simulate_with_rng};
pub use result::{FightResult, FighterDelta, Method};
pub use tick::{TickEvent, Zone};
