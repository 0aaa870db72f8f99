//! Error types for simulation operations.

use thiserror::Error;
use vf_core::BranchId;

/// Errors encountered while configuring or ticking a scene.
///
/// Numeric edge cases inside a tick (zero current, empty path) are no-ops,
/// not errors; these variants cover setup mistakes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Unknown branch: {branch}")]
    UnknownBranch { branch: BranchId },

    #[error("Duplicate branch: {branch}")]
    DuplicateBranch { branch: BranchId },

    #[error("Core error: {message}")]
    Core { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<vf_core::VfError> for SimError {
    fn from(e: vf_core::VfError) -> Self {
        match e {
            vf_core::VfError::NonFinite { what, .. } => SimError::NonPhysical { what },
            other => SimError::Core {
                message: other.to_string(),
            },
        }
    }
}

/// Reject NaN/inf and negative values.
pub(crate) fn validate_non_negative(val: f64, what: &'static str) -> SimResult<f64> {
    let val = vf_core::ensure_finite(val, what)?;
    if val < 0.0 {
        return Err(SimError::NonPhysical { what });
    }
    Ok(val)
}
