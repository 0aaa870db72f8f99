//! Shared application service layer for voltflow.
//!
//! This crate sits between the project file and any frontend. It compiles a
//! scene definition into a circuit plus flow scene, keeps the two in step
//! through [`CircuitController`], and exposes display snapshots and headless
//! playback.

pub mod compile;
pub mod controller;
pub mod error;
pub mod playback;
pub mod project_service;
pub mod snapshot;

// Re-export key types for convenience
pub use compile::{BranchControl, CompiledScene, compile_scene};
pub use controller::CircuitController;
pub use error::{AppError, AppResult};
pub use playback::{PlaybackFrame, PlaybackOptions, PlaybackRecord, run_playback};
pub use project_service::{
    SceneSummary, get_scene, list_scenes, load_project, open_scene, save_project,
    validate_project,
};
pub use snapshot::{BranchReading, ConservationReading, DisplaySnapshot, FlowRegime, LawKind};
