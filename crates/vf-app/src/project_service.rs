//! Project loading, saving, validation, and introspection.

use std::path::Path;

use vf_project::schema::{Project, SceneDef, TopologyDef};

use crate::controller::CircuitController;
use crate::error::{AppError, AppResult};

/// Summary of a scene for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub id: String,
    pub name: String,
    pub topology: TopologyDef,
    pub resistor_count: usize,
    pub source_voltage_v: f64,
    /// True when the scene has at least one path to animate.
    pub animated: bool,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Load and validate a project. `.json` files are read as JSON, anything
/// else as YAML.
pub fn load_project(path: &Path) -> AppResult<Project> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ProjectFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let project = if is_json(path) {
        vf_project::parse_json(&content)?
    } else {
        vf_project::parse_yaml(&content)?
    };
    Ok(project)
}

/// Save a project, validating it first.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    vf_project::validate_project(project)?;
    let content = if is_json(path) {
        vf_project::to_json_string(project)?
    } else {
        vf_project::to_yaml_string(project)?
    };

    std::fs::write(path, content).map_err(|e| AppError::ProjectFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Validate project structure.
pub fn validate_project(project: &Project) -> AppResult<()> {
    if project.scenes.is_empty() {
        return Err(AppError::Validation(
            "Project must have at least one scene".to_string(),
        ));
    }
    vf_project::validate_project(project)?;
    Ok(())
}

/// List all scenes in the project with summaries.
pub fn list_scenes(project: &Project) -> Vec<SceneSummary> {
    project
        .scenes
        .iter()
        .map(|scene| SceneSummary {
            id: scene.id.clone(),
            name: scene.name.clone(),
            topology: scene.topology,
            resistor_count: scene.resistors.len(),
            source_voltage_v: scene.source_voltage_v,
            animated: scene.trunk_path.is_some()
                || scene.resistors.iter().any(|r| r.path.is_some()),
        })
        .collect()
}

/// Get a specific scene by ID.
pub fn get_scene<'a>(project: &'a Project, scene_id: &str) -> AppResult<&'a SceneDef> {
    project
        .scene(scene_id)
        .ok_or_else(|| AppError::SceneNotFound(scene_id.to_string()))
}

/// Switch to a scene: compile it and hand back a ready controller.
pub fn open_scene(project: &Project, scene_id: &str) -> AppResult<CircuitController> {
    let scene = get_scene(project, scene_id)?;
    tracing::info!(scene = %scene.id, name = %scene.name, "opening scene");
    CircuitController::from_scene(scene)
}
