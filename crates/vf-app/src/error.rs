//! Error types for the vf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives every frontend one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write project file: {path}")]
    ProjectFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Unknown resistor '{key}' in scene '{scene}'")]
    UnknownResistor { scene: String, key: String },

    #[error("Circuit error: {0}")]
    Circuit(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for vf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<vf_project::ProjectError> for AppError {
    fn from(err: vf_project::ProjectError) -> Self {
        match err {
            vf_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<vf_project::ValidationError> for AppError {
    fn from(err: vf_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<vf_circuit::CircuitError> for AppError {
    fn from(err: vf_circuit::CircuitError) -> Self {
        AppError::Circuit(err.to_string())
    }
}

impl From<vf_sim::SimError> for AppError {
    fn from(err: vf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
