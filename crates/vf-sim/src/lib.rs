//! Tick-driven flow animation for voltflow circuits.
//!
//! Provides:
//! - Shared, immutable waypoint paths
//! - Path animator that moves a marker along a path at current-proportional speed
//! - Flow router that spawns markers at a junction with current-weighted branch choice
//! - Injectable random sources (seeded `StdRng`, fixed sequences for tests)
//! - Headless scene that owns animators, router and live markers
//!
//! Nothing here runs on its own: the host calls `tick(dt)` once per frame.

pub mod animator;
pub mod error;
pub mod marker;
pub mod path;
pub mod random;
pub mod router;
pub mod scene;

// Re-exports for public API
pub use animator::{AnimatorConfig, AnimatorState, PathAnimator};
pub use error::{SimError, SimResult};
pub use marker::Marker;
pub use path::{Path, Point};
pub use random::{RandomSource, SeededRandom, SequenceRandom};
pub use router::{FlowRouter, RouteBranch, RouterConfig, SpawnEvent, select_branch};
pub use scene::{FlowScene, FrameReport, SceneConfig};
