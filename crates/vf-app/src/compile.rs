//! Scene compilation: project definition -> circuit + flow scene.

use vf_circuit::{Circuit, CircuitBuilder, ResistanceClamp, Topology};
use vf_core::units::{ohms, volts};
use vf_core::{BranchId, Real};
use vf_project::schema::{SceneDef, TopologyDef};
use vf_sim::{
    AnimatorConfig, FlowRouter, FlowScene, Path, RouteBranch, RouterConfig, SceneConfig,
};

use crate::error::AppResult;

/// User-facing control for one resistor.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchControl {
    pub id: BranchId,
    /// Resistor id from the project file.
    pub key: String,
    pub name: String,
    pub min: Real,
    pub max: Real,
    /// True when the branch has its own animated path.
    pub animated: bool,
}

impl BranchControl {
    /// Clamp `value` into `[min, max]`.
    pub fn clamp(&self, value: Real) -> Real {
        value.clamp(self.min, self.max)
    }
}

/// Everything a controller needs to drive one scene.
#[derive(Debug, Clone)]
pub struct CompiledScene {
    pub scene_id: String,
    pub name: String,
    pub kind: TopologyDef,
    pub circuit: Circuit,
    pub controls: Vec<BranchControl>,
    pub flow: FlowScene,
}

pub fn topology_for(kind: TopologyDef) -> Topology {
    match kind {
        TopologyDef::Single | TopologyDef::Series => Topology::Series,
        TopologyDef::Parallel => Topology::Parallel,
    }
}

fn animator_config(def: &SceneDef) -> AnimatorConfig {
    AnimatorConfig {
        speed_factor: def.animation.speed_factor,
        arrival_tolerance: def.animation.arrival_tolerance,
        min_speed: def.animation.min_speed,
    }
}

/// Compile a scene definition. The definition is validated first.
pub fn compile_scene(def: &SceneDef) -> AppResult<CompiledScene> {
    vf_project::validate_scene(def)?;

    let mut builder = CircuitBuilder::new(topology_for(def.topology));
    builder.set_source(volts(def.source_voltage_v));
    builder.set_clamp(ResistanceClamp::new(def.clamp_ohm)?);

    let mut controls = Vec::with_capacity(def.resistors.len());
    for resistor in &def.resistors {
        let initial = resistor
            .resistance_ohm
            .clamp(resistor.min_ohm, resistor.max_ohm);
        if initial != resistor.resistance_ohm {
            tracing::warn!(
                scene = %def.id,
                resistor = %resistor.id,
                configured = resistor.resistance_ohm,
                applied = initial,
                "initial resistance outside control range"
            );
        }
        let id = builder.add_branch(resistor.name.clone(), ohms(initial));
        controls.push(BranchControl {
            id,
            key: resistor.id.clone(),
            name: resistor.name.clone(),
            min: resistor.min_ohm,
            max: resistor.max_ohm,
            animated: resistor.path.is_some(),
        });
    }
    let circuit = builder.build()?;

    let mut flow = FlowScene::new(SceneConfig {
        animator: animator_config(def),
        marker_lifetime: def.animation.marker_lifetime_s,
        max_markers: def.animation.max_markers,
    })?;
    if let Some(trunk) = &def.trunk_path {
        flow.set_trunk(Path::from_coords(trunk));
    }

    let mut route = Vec::new();
    for (resistor, control) in def.resistors.iter().zip(&controls) {
        let Some(coords) = &resistor.path else {
            continue;
        };
        let path = Path::from_coords(coords);
        flow.add_branch_animator(control.id, path.clone())?;
        route.push(RouteBranch::new(control.id, path));
    }

    // Validation guarantees a parallel scene has paths on all branches or none.
    if def.topology == TopologyDef::Parallel && !route.is_empty() {
        let router = FlowRouter::new(
            route,
            RouterConfig {
                min_current: def.router.min_current_a,
                min_rate: def.router.min_rate_a,
            },
        )?;
        flow.set_router(router);
    }

    tracing::debug!(
        scene = %def.id,
        branches = controls.len(),
        routed = flow.router().is_some(),
        "scene compiled"
    );

    Ok(CompiledScene {
        scene_id: def.id.clone(),
        name: def.name.clone(),
        kind: def.topology,
        circuit,
        controls,
        flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_project::schema::{AnimationDef, ResistorDef, RouterDef};

    fn resistor(id: &str, ohms: f64, path: bool) -> ResistorDef {
        ResistorDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            resistance_ohm: ohms,
            min_ohm: 1.0,
            max_ohm: 50.0,
            path: path.then(|| vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
        }
    }

    fn scene(topology: TopologyDef, resistors: Vec<ResistorDef>) -> SceneDef {
        SceneDef {
            id: "s".to_string(),
            name: "Scene".to_string(),
            topology,
            source_voltage_v: 12.0,
            clamp_ohm: 0.01,
            resistors,
            trunk_path: Some(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            animation: AnimationDef::default(),
            router: RouterDef::default(),
        }
    }

    #[test]
    fn parallel_with_paths_gets_a_router() {
        let def = scene(
            TopologyDef::Parallel,
            vec![resistor("a", 10.0, true), resistor("b", 20.0, true)],
        );
        let compiled = compile_scene(&def).unwrap();
        assert_eq!(compiled.circuit.topology(), Topology::Parallel);
        assert_eq!(compiled.flow.router().unwrap().branches().len(), 2);
        assert_eq!(compiled.flow.branch_animators().count(), 2);
        assert!(compiled.flow.trunk().is_some());
    }

    #[test]
    fn series_never_routes() {
        let def = scene(
            TopologyDef::Series,
            vec![resistor("a", 10.0, true), resistor("b", 20.0, false)],
        );
        let compiled = compile_scene(&def).unwrap();
        assert!(compiled.flow.router().is_none());
        assert_eq!(compiled.flow.branch_animators().count(), 1);
        assert!(compiled.controls[0].animated);
        assert!(!compiled.controls[1].animated);
    }

    #[test]
    fn single_compiles_to_one_branch_series() {
        let def = scene(TopologyDef::Single, vec![resistor("r1", 10.0, false)]);
        let compiled = compile_scene(&def).unwrap();
        assert_eq!(compiled.circuit.topology(), Topology::Series);
        assert_eq!(compiled.circuit.len(), 1);
        assert_eq!(compiled.kind, TopologyDef::Single);
    }

    #[test]
    fn initial_resistance_is_clamped_into_range() {
        let def = scene(TopologyDef::Single, vec![resistor("r1", 80.0, false)]);
        let compiled = compile_scene(&def).unwrap();
        assert_eq!(compiled.circuit.branches()[0].resistance.value, 50.0);
    }

    #[test]
    fn invalid_scene_is_rejected() {
        let def = scene(TopologyDef::Series, vec![]);
        assert!(matches!(
            compile_scene(&def),
            Err(crate::AppError::Validation(_))
        ));
    }
}
