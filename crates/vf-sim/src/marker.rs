//! Transient routed markers ("electrons").

use vf_core::{BranchId, MarkerId, Real};

use crate::animator::{AnimatorConfig, PathAnimator};
use crate::path::Point;
use crate::router::SpawnEvent;

/// A marker spawned by the router onto one branch.
#[derive(Debug, Clone)]
pub struct Marker {
    pub id: MarkerId,
    pub branch: BranchId,
    /// Seconds since spawn.
    pub age: Real,
    animator: PathAnimator,
}

impl Marker {
    pub fn spawn(id: MarkerId, event: SpawnEvent, config: AnimatorConfig) -> Self {
        Self {
            id,
            branch: event.branch,
            age: 0.0,
            animator: PathAnimator::new(event.path, config).with_current(event.current),
        }
    }

    pub fn tick(&mut self, dt: Real) -> Option<Point> {
        self.age += dt;
        self.animator.tick(dt)
    }

    pub fn position(&self) -> Option<Point> {
        self.animator.position()
    }

    pub fn animator(&self) -> &PathAnimator {
        &self.animator
    }

    pub fn set_current_flow(&mut self, current: Real) {
        self.animator.set_current_flow(current);
    }

    pub fn is_expired(&self, lifetime: Real) -> bool {
        self.age >= lifetime
    }
}
