//! Circuit controller: owns a scene's circuit, solution and flow scene and
//! keeps them consistent.

use vf_circuit::{Circuit, CircuitSolution, Topology};
use vf_core::units::{ohms, volts};
use vf_core::{BranchId, Real};
use vf_project::schema::{SceneDef, TopologyDef};
use vf_sim::{FlowScene, FrameReport, RandomSource};

use crate::compile::{BranchControl, CompiledScene, compile_scene};
use crate::error::{AppError, AppResult};
use crate::snapshot::{BranchReading, DisplaySnapshot, FlowRegime};

/// Drives one compiled scene.
///
/// Every control change rebuilds the circuit snapshot, re-solves it and
/// pushes the new currents into the flow scene before returning, so a
/// following [`CircuitController::tick`] always animates the latest solution.
#[derive(Debug, Clone)]
pub struct CircuitController {
    scene_id: String,
    name: String,
    kind: TopologyDef,
    circuit: Circuit,
    solution: CircuitSolution,
    controls: Vec<BranchControl>,
    flow: FlowScene,
}

impl CircuitController {
    pub fn from_scene(def: &SceneDef) -> AppResult<Self> {
        Self::from_compiled(compile_scene(def)?)
    }

    pub fn from_compiled(compiled: CompiledScene) -> AppResult<Self> {
        let solution = compiled.circuit.solve();
        let mut controller = Self {
            scene_id: compiled.scene_id,
            name: compiled.name,
            kind: compiled.kind,
            circuit: compiled.circuit,
            solution,
            controls: compiled.controls,
            flow: compiled.flow,
        };
        controller.propagate()?;
        Ok(controller)
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TopologyDef {
        self.kind
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn solution(&self) -> &CircuitSolution {
        &self.solution
    }

    pub fn controls(&self) -> &[BranchControl] {
        &self.controls
    }

    pub fn control(&self, key: &str) -> Option<&BranchControl> {
        self.controls.iter().find(|c| c.key == key)
    }

    pub fn flow(&self) -> &FlowScene {
        &self.flow
    }

    /// Set one branch's resistance, clamped into its control range.
    ///
    /// Returns the value actually applied.
    pub fn set_resistance(&mut self, id: BranchId, value: Real) -> AppResult<Real> {
        if !value.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "resistance must be finite, got {value}"
            )));
        }
        let control = self
            .controls
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown branch {id}")))?;

        let applied = control.clamp(value);
        if applied != value {
            tracing::warn!(
                scene = %self.scene_id,
                resistor = %control.key,
                requested = value,
                applied,
                "resistance clamped into control range"
            );
        }

        let next = self.circuit.with_resistance(id, ohms(applied))?;
        self.recompute(next)?;
        Ok(applied)
    }

    /// Same as [`set_resistance`](Self::set_resistance), addressed by the
    /// resistor id from the project file.
    pub fn set_resistance_by_key(&mut self, key: &str, value: Real) -> AppResult<Real> {
        let id = self
            .control(key)
            .map(|c| c.id)
            .ok_or_else(|| AppError::UnknownResistor {
                scene: self.scene_id.clone(),
                key: key.to_string(),
            })?;
        self.set_resistance(id, value)
    }

    pub fn set_source_voltage(&mut self, value: Real) -> AppResult<()> {
        let next = self.circuit.with_source(volts(value))?;
        self.recompute(next)
    }

    /// Advance the flow scene by `dt` seconds.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, dt: Real, rng: &mut R) -> AppResult<FrameReport> {
        Ok(self.flow.tick(dt, rng)?)
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let branches = self
            .controls
            .iter()
            .filter_map(|control| {
                let branch = self.circuit.branch(control.id)?;
                let sol = self.solution.branch(control.id)?;
                Some(BranchReading {
                    key: control.key.clone(),
                    name: control.name.clone(),
                    resistance_ohm: branch.resistance.value,
                    voltage_v: sol.voltage.value,
                    current_a: sol.current.value,
                })
            })
            .collect::<Vec<_>>();

        let regime = match (self.kind, self.controls.first(), branches.first()) {
            (TopologyDef::Single, Some(control), Some(reading)) => {
                Some(FlowRegime::classify(reading.resistance_ohm, control.max))
            }
            _ => None,
        };

        DisplaySnapshot {
            scene_id: self.scene_id.clone(),
            scene_name: self.name.clone(),
            topology: self.kind,
            source_voltage_v: self.solution.source.value,
            total_resistance_ohm: self.solution.total_resistance.value,
            total_current_a: self.solution.total_current.value,
            branches,
            conservation: self.solution.conservation.into(),
            regime,
        }
    }

    fn recompute(&mut self, circuit: Circuit) -> AppResult<()> {
        self.solution = circuit.solve();
        self.circuit = circuit;
        tracing::debug!(
            scene = %self.scene_id,
            total_current_a = self.solution.total_current.value,
            satisfied = self.solution.conservation.satisfied,
            "circuit recomputed"
        );
        self.propagate()
    }

    /// Push the current solution into every animator and the router.
    fn propagate(&mut self) -> AppResult<()> {
        let total = self.solution.total_current.value;
        self.flow.set_total_current(total);

        for control in self.controls.iter().filter(|c| c.animated) {
            let current = match self.circuit.topology() {
                Topology::Series => total,
                Topology::Parallel => self
                    .solution
                    .branch(control.id)
                    .map(|b| b.current.value)
                    .unwrap_or(0.0),
            };
            self.flow.set_branch_current(control.id, current)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_project::schema::{AnimationDef, ResistorDef, RouterDef};
    use vf_sim::SequenceRandom;

    fn resistor(id: &str, ohms: f64) -> ResistorDef {
        ResistorDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            resistance_ohm: ohms,
            min_ohm: 1.0,
            max_ohm: 50.0,
            path: Some(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        }
    }

    fn scene(topology: TopologyDef, resistors: Vec<ResistorDef>, v: f64) -> SceneDef {
        SceneDef {
            id: "s".to_string(),
            name: "Scene".to_string(),
            topology,
            source_voltage_v: v,
            clamp_ohm: 0.01,
            resistors,
            trunk_path: Some(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
            animation: AnimationDef::default(),
            router: RouterDef::default(),
        }
    }

    #[test]
    fn parallel_change_propagates_before_return() {
        let def = scene(
            TopologyDef::Parallel,
            vec![resistor("r1", 10.0), resistor("r2", 20.0)],
            12.0,
        );
        let mut ctl = CircuitController::from_scene(&def).unwrap();
        let r1 = ctl.control("r1").unwrap().id;
        let r2 = ctl.control("r2").unwrap().id;

        assert!((ctl.flow().router().unwrap().total_current() - 1.8).abs() < 1e-12);

        ctl.set_resistance_by_key("r2", 40.0).unwrap();
        let flow = ctl.flow();
        assert!((flow.branch_animator(r2).unwrap().current_flow() - 0.3).abs() < 1e-12);
        assert!((flow.branch_animator(r1).unwrap().current_flow() - 1.2).abs() < 1e-12);
        assert!((flow.trunk().unwrap().current_flow() - 1.5).abs() < 1e-12);
        assert!((flow.router().unwrap().total_current() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn series_animators_share_total_current() {
        let def = scene(
            TopologyDef::Series,
            vec![resistor("r1", 10.0), resistor("r2", 20.0), resistor("r3", 30.0)],
            12.0,
        );
        let ctl = CircuitController::from_scene(&def).unwrap();
        for (_, anim) in ctl.flow().branch_animators() {
            assert!((anim.current_flow() - 0.2).abs() < 1e-12);
        }
        let snap = ctl.snapshot();
        let drops: Vec<f64> = snap.branches.iter().map(|b| b.voltage_v).collect();
        assert!((drops[0] - 2.0).abs() < 1e-12);
        assert!((drops[1] - 4.0).abs() < 1e-12);
        assert!((drops[2] - 6.0).abs() < 1e-12);
        assert!(snap.conservation.satisfied);
        assert!(snap.regime.is_none());
    }

    #[test]
    fn out_of_range_value_is_clamped() {
        let def = scene(TopologyDef::Single, vec![resistor("r1", 10.0)], 10.0);
        let mut ctl = CircuitController::from_scene(&def).unwrap();

        assert_eq!(ctl.set_resistance_by_key("r1", 500.0).unwrap(), 50.0);
        let snap = ctl.snapshot();
        assert_eq!(snap.branches[0].resistance_ohm, 50.0);
        assert!((snap.total_current_a - 0.2).abs() < 1e-12);
        assert_eq!(snap.regime, Some(FlowRegime::Restricted));

        assert_eq!(ctl.set_resistance_by_key("r1", 0.0).unwrap(), 1.0);
        assert_eq!(ctl.snapshot().regime, Some(FlowRegime::Open));
    }

    #[test]
    fn bad_inputs_are_errors() {
        let def = scene(TopologyDef::Single, vec![resistor("r1", 10.0)], 10.0);
        let mut ctl = CircuitController::from_scene(&def).unwrap();
        assert!(matches!(
            ctl.set_resistance_by_key("nope", 5.0),
            Err(AppError::UnknownResistor { .. })
        ));
        assert!(ctl.set_resistance_by_key("r1", f64::NAN).is_err());
        assert!(ctl.set_source_voltage(f64::INFINITY).is_err());
    }

    #[test]
    fn source_change_rescales_currents() {
        let def = scene(TopologyDef::Single, vec![resistor("r1", 10.0)], 10.0);
        let mut ctl = CircuitController::from_scene(&def).unwrap();
        ctl.set_source_voltage(20.0).unwrap();
        assert!((ctl.snapshot().total_current_a - 2.0).abs() < 1e-12);
        assert!((ctl.flow().trunk().unwrap().current_flow() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn tick_advances_flow_scene() {
        let def = scene(
            TopologyDef::Parallel,
            vec![resistor("r1", 10.0), resistor("r2", 20.0)],
            12.0,
        );
        let mut ctl = CircuitController::from_scene(&def).unwrap();
        let mut rng = SequenceRandom::new(vec![0.1]);
        let frame = ctl.tick(0.1, &mut rng).unwrap();
        assert_eq!(frame.spawned.map(|(_, b)| b), ctl.control("r1").map(|c| c.id));
        assert_eq!(frame.live, 1);
    }
}
