//! Error taxonomy for fight simulation

use crate::fighter::Corner;

/// Errors surfaced by [`crate::simulate`] and its collaborators.
///
/// Input and configuration errors are raised before the first tick. Invariant
/// violations are raised mid-fight and discard the partial fight entirely.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FightError {
    #[error("invalid fighter state for {corner} corner: {reason}")]
    InvalidFighterState { corner: Corner, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invariant violated in round {round}, tick {tick}: {detail}")]
    InvariantViolation { round: u8, tick: u8, detail: String },
}

impl FightError {
    pub(crate) fn invalid(corner: Corner, reason: impl Into<String>) -> Self {
        FightError::InvalidFighterState {
            corner,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FightError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FightError>;
