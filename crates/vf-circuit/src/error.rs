//! Circuit-specific error types.

use thiserror::Error;
use vf_core::{BranchId, VfError};

/// Circuit construction and update errors.
///
/// All of these are setup mistakes; numeric edge cases during solving are
/// clamped instead of reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    #[error("Circuit must have at least one branch")]
    NoBranches,

    #[error("Non-finite resistance on branch {branch}: {value}")]
    NonFiniteResistance { branch: BranchId, value: f64 },

    #[error("Non-finite source voltage: {value}")]
    NonFiniteSource { value: f64 },

    #[error("Invalid resistance clamp {value} (must be finite and > 0)")]
    InvalidClamp { value: f64 },

    #[error("Branch {branch} not found (circuit has {len} branches)")]
    UnknownBranch { branch: BranchId, len: usize },

    #[error("Branch {branch} is stored at slot {slot}")]
    MisplacedBranch { branch: BranchId, slot: usize },

    #[error("Duplicate branch name: {name}")]
    DuplicateName { name: String },
}

pub type CircuitResult<T> = Result<T, CircuitError>;

impl From<CircuitError> for VfError {
    fn from(err: CircuitError) -> Self {
        VfError::Config {
            what: err.to_string(),
        }
    }
}
