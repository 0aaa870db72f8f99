//! Electrical model: Ohm's law over series and parallel resistor networks.
//!
//! Everything here is a pure function of the circuit. Resistances at or below
//! the clamp epsilon are raised to epsilon before any division, so every
//! solution is finite for finite inputs.

use vf_core::numeric::{Real, Tolerances, floor_at, nearly_equal};
use vf_core::units::{Current, Resistance, Voltage, amps, ohms, volts};
use vf_core::BranchId;

use crate::circuit::{Circuit, Topology};
use crate::error::{CircuitError, CircuitResult};

/// Default clamp for resistance values (ohm).
pub const DEFAULT_CLAMP_OHM: Real = 0.01;

/// Lower bound applied to every resistance before it is used in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistanceClamp {
    epsilon: Real,
}

impl Default for ResistanceClamp {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_CLAMP_OHM,
        }
    }
}

impl ResistanceClamp {
    /// Create a clamp with the given epsilon in ohms. Must be finite and > 0.
    pub fn new(epsilon: Real) -> CircuitResult<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(CircuitError::InvalidClamp { value: epsilon });
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> Real {
        self.epsilon
    }

    #[inline]
    pub fn apply(&self, resistance: Resistance) -> Resistance {
        ohms(self.apply_value(resistance.value))
    }

    #[inline]
    pub(crate) fn apply_value(&self, ohm: Real) -> Real {
        floor_at(ohm, self.epsilon)
    }
}

/// Result of [`compute_series`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSolution {
    pub total_resistance: Resistance,
    pub total_current: Current,
    /// Voltage drop across each branch, in input order.
    pub voltage_drops: Vec<Voltage>,
}

/// Result of [`compute_parallel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelSolution {
    pub total_resistance: Resistance,
    pub total_current: Current,
    /// Current through each branch, in input order.
    pub branch_currents: Vec<Current>,
}

/// Series network: R = ΣRᵢ, I = V/R, Vᵢ = I·Rᵢ.
pub fn compute_series(
    source: Voltage,
    resistances: &[Resistance],
    clamp: ResistanceClamp,
) -> CircuitResult<SeriesSolution> {
    if resistances.is_empty() {
        return Err(CircuitError::NoBranches);
    }
    Ok(series(source, resistances, clamp))
}

/// Parallel network: Iᵢ = V/Rᵢ, I = ΣIᵢ, R = 1/Σ(1/Rᵢ).
pub fn compute_parallel(
    source: Voltage,
    resistances: &[Resistance],
    clamp: ResistanceClamp,
) -> CircuitResult<ParallelSolution> {
    if resistances.is_empty() {
        return Err(CircuitError::NoBranches);
    }
    Ok(parallel(source, resistances, clamp))
}

fn series(source: Voltage, resistances: &[Resistance], clamp: ResistanceClamp) -> SeriesSolution {
    let clamped: Vec<Real> = resistances
        .iter()
        .map(|r| clamp.apply_value(r.value))
        .collect();

    let total_r: Real = clamped.iter().sum();
    let total_i = source.value / clamp.apply_value(total_r);

    SeriesSolution {
        total_resistance: ohms(total_r),
        total_current: amps(total_i),
        voltage_drops: clamped.iter().map(|r| volts(total_i * r)).collect(),
    }
}

fn parallel(
    source: Voltage,
    resistances: &[Resistance],
    clamp: ResistanceClamp,
) -> ParallelSolution {
    let mut reciprocal_sum = 0.0;
    let mut branch_i = Vec::with_capacity(resistances.len());
    for r in resistances {
        let r = clamp.apply_value(r.value);
        reciprocal_sum += 1.0 / r;
        branch_i.push(source.value / r);
    }

    // Total is the definitional sum of branch currents, in branch order.
    let total_i: Real = branch_i.iter().sum();

    ParallelSolution {
        total_resistance: ohms(1.0 / reciprocal_sum),
        total_current: amps(total_i),
        branch_currents: branch_i.into_iter().map(amps).collect(),
    }
}

/// Conservation law checked for a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConservationLaw {
    /// Σ branch drops = source voltage (series).
    Kvl,
    /// Σ branch currents = total current (parallel).
    Kcl,
}

impl ConservationLaw {
    pub fn for_topology(topology: Topology) -> Self {
        match topology {
            Topology::Series => ConservationLaw::Kvl,
            Topology::Parallel => ConservationLaw::Kcl,
        }
    }
}

/// Outcome of a KVL/KCL check, in SI base units (V or A).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationCheck {
    pub law: ConservationLaw,
    pub expected: Real,
    pub measured: Real,
    pub satisfied: bool,
}

impl ConservationCheck {
    fn new(law: ConservationLaw, expected: Real, measured: Real) -> Self {
        Self {
            law,
            expected,
            measured,
            satisfied: nearly_equal(expected, measured, Tolerances::default()),
        }
    }
}

/// Voltage across and current through one branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSolution {
    pub id: BranchId,
    pub voltage: Voltage,
    pub current: Current,
}

/// Immutable snapshot of every derived quantity of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitSolution {
    pub topology: Topology,
    pub source: Voltage,
    pub total_resistance: Resistance,
    pub total_current: Current,
    pub branches: Vec<BranchSolution>,
    pub conservation: ConservationCheck,
}

impl CircuitSolution {
    pub fn branch(&self, id: BranchId) -> Option<&BranchSolution> {
        self.branches.get(id.slot())
    }

    /// (branch, current) pairs in wiring order.
    pub fn branch_currents(&self) -> Vec<(BranchId, Current)> {
        self.branches.iter().map(|b| (b.id, b.current)).collect()
    }
}

/// Solve a built circuit according to its topology.
pub fn solve(circuit: &Circuit) -> CircuitSolution {
    let resistances = circuit.resistances();
    let source = circuit.source();
    let law = ConservationLaw::for_topology(circuit.topology());

    let (total_resistance, total_current, branches, conservation) = match circuit.topology() {
        Topology::Series => {
            let sol = series(source, &resistances, circuit.clamp());
            let branches: Vec<BranchSolution> = circuit
                .branches()
                .iter()
                .zip(&sol.voltage_drops)
                .map(|(b, drop)| BranchSolution {
                    id: b.id,
                    voltage: *drop,
                    current: sol.total_current,
                })
                .collect();
            let drop_sum: Real = sol.voltage_drops.iter().map(|v| v.value).sum();
            let check = ConservationCheck::new(law, source.value, drop_sum);
            (sol.total_resistance, sol.total_current, branches, check)
        }
        Topology::Parallel => {
            let sol = parallel(source, &resistances, circuit.clamp());
            let branches: Vec<BranchSolution> = circuit
                .branches()
                .iter()
                .zip(&sol.branch_currents)
                .map(|(b, current)| BranchSolution {
                    id: b.id,
                    voltage: source,
                    current: *current,
                })
                .collect();
            let current_sum: Real = sol.branch_currents.iter().map(|i| i.value).sum();
            let check = ConservationCheck::new(law, sol.total_current.value, current_sum);
            (sol.total_resistance, sol.total_current, branches, check)
        }
    };

    tracing::debug!(
        topology = ?circuit.topology(),
        total_r = total_resistance.value,
        total_i = total_current.value,
        conserved = conservation.satisfied,
        "circuit solved"
    );

    CircuitSolution {
        topology: circuit.topology(),
        source,
        total_resistance,
        total_current,
        branches,
        conservation,
    }
}
