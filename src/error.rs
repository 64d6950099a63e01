//! Error types
//!
//! The simulation has no I/O, so its error surface is small: lifecycle calls made
//! in the wrong phase, and configuration that fails to load or validate.

use crate::sim::state::RoundPhase;
use crate::sim::upgrades::UpgradeId;

/// Refused simulation calls. State is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("cannot {action} while round is {phase:?}")]
    InvalidTransition {
        phase: RoundPhase,
        action: &'static str,
    },

    #[error("upgrade {0:?} was not among the offered options")]
    UpgradeNotOffered(UpgradeId),
}

/// Failures loading or validating a [`crate::Tuning`] file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value: {0}")]
    Invalid(String),
}
