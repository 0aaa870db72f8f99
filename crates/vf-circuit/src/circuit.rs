//! Core circuit data structures.

use vf_core::BranchId;
use vf_core::units::{Resistance, Voltage};

use crate::error::{CircuitError, CircuitResult};
use crate::model::{self, CircuitSolution, ResistanceClamp};
use crate::validate;

/// How the branches of a circuit are wired to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Branches share one current; drops add up to the source voltage.
    Series,
    /// Branches share the source voltage; currents add up at the junction.
    Parallel,
}

/// One resistive element.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    /// Raw configured resistance. May be zero or negative; the solver clamps it.
    pub resistance: Resistance,
}

/// A validated, immutable circuit snapshot.
///
/// Topology and branch count are fixed once built. Value changes produce a
/// new snapshot through [`Circuit::with_resistance`] / [`Circuit::with_source`],
/// so no caller can observe a half-updated circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub(crate) topology: Topology,
    pub(crate) source: Voltage,
    pub(crate) branches: Vec<Branch>,
    pub(crate) clamp: ResistanceClamp,
}

impl Circuit {
    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn source(&self) -> Voltage {
        self.source
    }

    pub fn clamp(&self) -> ResistanceClamp {
        self.clamp
    }

    /// Return all branches in wiring order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Get a branch by ID (returns None if ID out of bounds).
    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id.slot())
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Raw branch resistances in wiring order.
    pub fn resistances(&self) -> Vec<Resistance> {
        self.branches.iter().map(|b| b.resistance).collect()
    }

    /// Copy of this circuit with one branch's resistance replaced.
    pub fn with_resistance(&self, id: BranchId, resistance: Resistance) -> CircuitResult<Circuit> {
        if self.branch(id).is_none() {
            return Err(CircuitError::UnknownBranch {
                branch: id,
                len: self.branches.len(),
            });
        }
        validate::validate_resistance(id, resistance)?;

        let mut next = self.clone();
        next.branches[id.slot()].resistance = resistance;
        Ok(next)
    }

    /// Copy of this circuit driven by a different source voltage.
    pub fn with_source(&self, source: Voltage) -> CircuitResult<Circuit> {
        validate::validate_source(source)?;
        let mut next = self.clone();
        next.source = source;
        Ok(next)
    }

    /// Solve the circuit. Infallible: a built circuit always has branches.
    pub fn solve(&self) -> CircuitSolution {
        model::solve(self)
    }
}
