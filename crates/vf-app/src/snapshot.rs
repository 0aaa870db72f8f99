//! Display snapshot: the numbers a frontend shows after each recompute.
//!
//! Values are plain SI numbers. Formatting into labels is left to the
//! frontend.

use serde::Serialize;
use vf_circuit::{ConservationCheck, ConservationLaw};
use vf_core::Real;
use vf_project::schema::TopologyDef;

/// How freely current flows in a single-resistor scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    /// Resistance above half of the control range maximum.
    Restricted,
    Open,
}

impl FlowRegime {
    pub fn classify(resistance: Real, max: Real) -> Self {
        if resistance > max / 2.0 {
            FlowRegime::Restricted
        } else {
            FlowRegime::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LawKind {
    Kvl,
    Kcl,
}

impl From<ConservationLaw> for LawKind {
    fn from(law: ConservationLaw) -> Self {
        match law {
            ConservationLaw::Kvl => LawKind::Kvl,
            ConservationLaw::Kcl => LawKind::Kcl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConservationReading {
    pub law: LawKind,
    pub expected: Real,
    pub measured: Real,
    pub satisfied: bool,
}

impl From<ConservationCheck> for ConservationReading {
    fn from(check: ConservationCheck) -> Self {
        Self {
            law: check.law.into(),
            expected: check.expected,
            measured: check.measured,
            satisfied: check.satisfied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchReading {
    pub key: String,
    pub name: String,
    pub resistance_ohm: Real,
    pub voltage_v: Real,
    pub current_a: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub scene_id: String,
    pub scene_name: String,
    pub topology: TopologyDef,
    pub source_voltage_v: Real,
    pub total_resistance_ohm: Real,
    pub total_current_a: Real,
    pub branches: Vec<BranchReading>,
    pub conservation: ConservationReading,
    /// Only set for single-resistor scenes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<FlowRegime>,
}

impl DisplaySnapshot {
    pub fn branch(&self, key: &str) -> Option<&BranchReading> {
        self.branches.iter().find(|b| b.key == key)
    }
}
