//! Incremental circuit builder.

use vf_core::BranchId;
use vf_core::units::{Resistance, Voltage, volts};

use crate::circuit::{Branch, Circuit, Topology};
use crate::error::CircuitResult;
use crate::model::ResistanceClamp;
use crate::validate;

/// Builder for constructing a circuit incrementally.
///
/// Use `add_branch` to build up the circuit, then call `build()` to validate
/// and freeze it into an immutable `Circuit`.
#[derive(Debug)]
pub struct CircuitBuilder {
    topology: Topology,
    source: Voltage,
    clamp: ResistanceClamp,
    branches: Vec<Branch>,
    next_branch_id: u32,
}

impl CircuitBuilder {
    /// Create a new empty builder (0 V source, default clamp).
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            source: volts(0.0),
            clamp: ResistanceClamp::default(),
            branches: Vec::new(),
            next_branch_id: 0,
        }
    }

    pub fn set_source(&mut self, source: Voltage) {
        self.source = source;
    }

    pub fn set_clamp(&mut self, clamp: ResistanceClamp) {
        self.clamp = clamp;
    }

    /// Add a branch and return its ID. IDs follow wiring order.
    pub fn add_branch(&mut self, name: impl Into<String>, resistance: Resistance) -> BranchId {
        let id = BranchId::from_index(self.next_branch_id);
        self.next_branch_id += 1;
        self.branches.push(Branch {
            id,
            name: name.into(),
            resistance,
        });
        id
    }

    /// Build and validate the circuit, returning an immutable `Circuit`.
    pub fn build(self) -> CircuitResult<Circuit> {
        validate::validate_structure(self.source, &self.branches)?;

        tracing::debug!(
            topology = ?self.topology,
            branches = self.branches.len(),
            source_v = self.source.value,
            "circuit built"
        );

        Ok(Circuit {
            topology: self.topology,
            source: self.source,
            branches: self.branches,
            clamp: self.clamp,
        })
    }
}
