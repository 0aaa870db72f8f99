//! vf-project: project file format and validation.
//!
//! A project holds one or more circuit scenes. Files are YAML or JSON and are
//! validated on load and before save.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project, validate_scene};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_yaml(content: &str) -> ProjectResult<Project> {
    let project: Project = serde_yaml::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn parse_json(content: &str) -> ProjectResult<Project> {
    let project: Project = serde_json::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn to_yaml_string(project: &Project) -> ProjectResult<String> {
    Ok(serde_yaml::to_string(project)?)
}

pub fn to_json_string(project: &Project) -> ProjectResult<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Project> {
    parse_yaml(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = to_yaml_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Project> {
    parse_json(&std::fs::read_to_string(path)?)
}

pub fn save_json(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = to_json_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}
