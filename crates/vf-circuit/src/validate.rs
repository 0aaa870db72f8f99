//! Circuit validation logic.

use std::collections::HashSet;
use vf_core::BranchId;
use vf_core::units::{Resistance, Voltage};

use crate::circuit::Branch;
use crate::error::{CircuitError, CircuitResult};

/// Validate a full branch set before freezing it into a `Circuit`.
pub(crate) fn validate_structure(source: Voltage, branches: &[Branch]) -> CircuitResult<()> {
    if branches.is_empty() {
        return Err(CircuitError::NoBranches);
    }

    validate_source(source)?;

    // IDs must be contiguous and match their slot
    for (slot, branch) in branches.iter().enumerate() {
        if branch.id.slot() != slot {
            return Err(CircuitError::MisplacedBranch {
                branch: branch.id,
                slot,
            });
        }
    }

    let mut names = HashSet::new();
    for branch in branches {
        if !names.insert(branch.name.as_str()) {
            return Err(CircuitError::DuplicateName {
                name: branch.name.clone(),
            });
        }
        validate_resistance(branch.id, branch.resistance)?;
    }

    Ok(())
}

/// Resistance may be zero or negative (clamped at solve time) but not NaN/inf.
pub(crate) fn validate_resistance(id: BranchId, resistance: Resistance) -> CircuitResult<()> {
    if !resistance.value.is_finite() {
        return Err(CircuitError::NonFiniteResistance {
            branch: id,
            value: resistance.value,
        });
    }
    Ok(())
}

pub(crate) fn validate_source(source: Voltage) -> CircuitResult<()> {
    if !source.value.is_finite() {
        return Err(CircuitError::NonFiniteSource {
            value: source.value,
        });
    }
    Ok(())
}
