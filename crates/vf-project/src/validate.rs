//! Project validation logic.

use std::collections::HashSet;

use crate::schema::{AnimationDef, PathDef, Project, ResistorDef, RouterDef, SceneDef, TopologyDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: String, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl FnOnce() -> String, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(invalid(field(), v, "must be positive and finite"));
    }
    Ok(())
}

fn non_negative(field: impl FnOnce() -> String, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v < 0.0 {
        return Err(invalid(field(), v, "must be non-negative and finite"));
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut scene_ids = HashSet::new();
    for scene in &project.scenes {
        if !scene_ids.insert(&scene.id) {
            return Err(ValidationError::DuplicateId {
                id: scene.id.clone(),
                context: "scenes".to_string(),
            });
        }
        validate_scene(scene)?;
    }

    Ok(())
}

pub fn validate_scene(scene: &SceneDef) -> Result<(), ValidationError> {
    if scene.resistors.is_empty() {
        return Err(invalid(
            format!("scene '{}' resistors", scene.id),
            0,
            "at least one resistor is required",
        ));
    }
    if scene.topology == TopologyDef::Single && scene.resistors.len() != 1 {
        return Err(invalid(
            format!("scene '{}' resistors", scene.id),
            scene.resistors.len(),
            "single topology takes exactly one resistor",
        ));
    }

    // Negative sources are legal; currents just change sign.
    if !scene.source_voltage_v.is_finite() {
        return Err(invalid(
            format!("scene '{}' source_voltage_v", scene.id),
            scene.source_voltage_v,
            "must be finite",
        ));
    }
    positive(|| format!("scene '{}' clamp_ohm", scene.id), scene.clamp_ohm)?;

    let mut resistor_ids = HashSet::new();
    for resistor in &scene.resistors {
        if !resistor_ids.insert(&resistor.id) {
            return Err(ValidationError::DuplicateId {
                id: resistor.id.clone(),
                context: format!("scene '{}' resistors", scene.id),
            });
        }
        validate_resistor(resistor)?;
    }

    if scene.topology == TopologyDef::Parallel {
        let with_path = scene.resistors.iter().filter(|r| r.path.is_some()).count();
        if with_path != 0 && with_path != scene.resistors.len() {
            return Err(ValidationError::Unsupported {
                feature: format!("partial branch paths in scene '{}'", scene.id),
                reason: "a parallel junction routes markers onto every branch, so either \
                         every resistor has a path or none does"
                    .to_string(),
            });
        }
    }

    if let Some(trunk) = &scene.trunk_path {
        validate_path(format!("scene '{}' trunk_path", scene.id), trunk)?;
    }
    validate_animation(&scene.id, &scene.animation)?;
    validate_router(&scene.id, &scene.router)?;

    Ok(())
}

fn validate_resistor(resistor: &ResistorDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("resistor '{}' {}", resistor.id, name);

    non_negative(|| field("min_ohm"), resistor.min_ohm)?;
    positive(|| field("max_ohm"), resistor.max_ohm)?;
    if resistor.min_ohm > resistor.max_ohm {
        return Err(invalid(
            field("min_ohm"),
            resistor.min_ohm,
            "must not exceed max_ohm",
        ));
    }
    // Zero is allowed and clamped at solve time.
    non_negative(|| field("resistance_ohm"), resistor.resistance_ohm)?;

    if let Some(path) = &resistor.path {
        validate_path(field("path"), path)?;
    }
    Ok(())
}

fn validate_path(field: String, path: &PathDef) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(invalid(field, "[]", "path needs at least one waypoint"));
    }
    if let Some((i, p)) = path
        .iter()
        .enumerate()
        .find(|(_, p)| p.iter().any(|c| !c.is_finite()))
    {
        return Err(invalid(
            format!("{field}[{i}]"),
            format!("{p:?}"),
            "waypoint coordinates must be finite",
        ));
    }
    Ok(())
}

fn validate_animation(scene_id: &str, anim: &AnimationDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("scene '{scene_id}' animation.{name}");

    non_negative(|| field("speed_factor"), anim.speed_factor)?;
    positive(|| field("arrival_tolerance"), anim.arrival_tolerance)?;
    non_negative(|| field("min_speed"), anim.min_speed)?;
    positive(|| field("marker_lifetime_s"), anim.marker_lifetime_s)?;
    if anim.max_markers == 0 {
        return Err(invalid(field("max_markers"), 0, "must be positive"));
    }
    Ok(())
}

fn validate_router(scene_id: &str, router: &RouterDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("scene '{scene_id}' router.{name}");

    non_negative(|| field("min_current_a"), router.min_current_a)?;
    positive(|| field("min_rate_a"), router.min_rate_a)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnimationDef, RouterDef};

    fn resistor(id: &str, ohms: f64) -> ResistorDef {
        ResistorDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            resistance_ohm: ohms,
            min_ohm: 1.0,
            max_ohm: 50.0,
            path: None,
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
            trunk_path: None,
            animation: AnimationDef::default(),
            router: RouterDef::default(),
        }
    }

    #[test]
    fn accepts_basic_scenes() {
        validate_scene(&scene(TopologyDef::Single, vec![resistor("r1", 10.0)])).unwrap();
        validate_scene(&scene(
            TopologyDef::Parallel,
            vec![resistor("r1", 10.0), resistor("r2", 20.0)],
        ))
        .unwrap();
    }

    #[test]
    fn single_requires_exactly_one_resistor() {
        let s = scene(
            TopologyDef::Single,
            vec![resistor("r1", 10.0), resistor("r2", 10.0)],
        );
        assert!(matches!(
            validate_scene(&s),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_empty_and_duplicate_resistors() {
        assert!(validate_scene(&scene(TopologyDef::Series, vec![])).is_err());

        let dup = scene(
            TopologyDef::Series,
            vec![resistor("r1", 10.0), resistor("r1", 20.0)],
        );
        assert!(matches!(
            validate_scene(&dup),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn zero_resistance_is_allowed() {
        let mut r = resistor("r1", 0.0);
        r.min_ohm = 0.0;
        validate_scene(&scene(TopologyDef::Single, vec![r])).unwrap();
    }

    #[test]
    fn rejects_bad_ranges_and_values() {
        let mut r = resistor("r1", 10.0);
        r.min_ohm = 60.0;
        assert!(validate_scene(&scene(TopologyDef::Single, vec![r])).is_err());

        let r = resistor("r1", f64::NAN);
        assert!(validate_scene(&scene(TopologyDef::Single, vec![r])).is_err());

        let mut s = scene(TopologyDef::Single, vec![resistor("r1", 10.0)]);
        s.clamp_ohm = 0.0;
        assert!(validate_scene(&s).is_err());

        let mut s = scene(TopologyDef::Single, vec![resistor("r1", 10.0)]);
        s.source_voltage_v = f64::INFINITY;
        assert!(validate_scene(&s).is_err());
    }

    #[test]
    fn rejects_empty_paths() {
        let mut s = scene(TopologyDef::Series, vec![resistor("r1", 10.0)]);
        s.trunk_path = Some(vec![]);
        assert!(validate_scene(&s).is_err());
    }

    #[test]
    fn parallel_paths_are_all_or_nothing() {
        let mut a = resistor("r1", 10.0);
        a.path = Some(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let s = scene(TopologyDef::Parallel, vec![a, resistor("r2", 20.0)]);
        assert!(matches!(
            validate_scene(&s),
            Err(ValidationError::Unsupported { .. })
        ));
    }

    #[test]
    fn version_bounds() {
        let project = Project {
            version: LATEST_VERSION + 1,
            name: "p".to_string(),
            scenes: vec![],
        };
        assert_eq!(
            validate_project(&project),
            Err(ValidationError::UnsupportedVersion {
                version: LATEST_VERSION + 1
            })
        );
    }
}
