//! Headless scene: every animator, the junction router and live markers,
//! advanced together once per tick.

use vf_core::{BranchId, MarkerId, Real};

use crate::animator::{AnimatorConfig, PathAnimator};
use crate::error::{SimError, SimResult, validate_non_negative};
use crate::marker::Marker;
use crate::path::Path;
use crate::random::RandomSource;
use crate::router::FlowRouter;

pub const DEFAULT_MARKER_LIFETIME: Real = 5.0;
pub const DEFAULT_MAX_MARKERS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub animator: AnimatorConfig,
    /// Seconds a routed marker lives before it is removed.
    pub marker_lifetime: Real,
    /// Oldest markers are dropped beyond this count.
    pub max_markers: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            animator: AnimatorConfig::default(),
            marker_lifetime: DEFAULT_MARKER_LIFETIME,
            max_markers: DEFAULT_MAX_MARKERS,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> SimResult<()> {
        self.animator.validate()?;
        if !self.marker_lifetime.is_finite() || self.marker_lifetime <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "marker_lifetime must be positive",
            });
        }
        if self.max_markers == 0 {
            return Err(SimError::InvalidArg {
                what: "max_markers must be positive",
            });
        }
        Ok(())
    }
}

/// What happened during one [`FlowScene::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Scene time after the tick.
    pub time: Real,
    pub spawned: Option<(MarkerId, BranchId)>,
    /// Markers removed this tick (lifetime or capacity).
    pub expired: usize,
    pub live: usize,
}

#[derive(Debug, Clone)]
pub struct FlowScene {
    config: SceneConfig,
    trunk: Option<PathAnimator>,
    branch_animators: Vec<(BranchId, PathAnimator)>,
    router: Option<FlowRouter>,
    markers: Vec<Marker>,
    next_marker: u32,
    time: Real,
}

impl FlowScene {
    pub fn new(config: SceneConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trunk: None,
            branch_animators: Vec::new(),
            router: None,
            markers: Vec::new(),
            next_marker: 0,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Animator for the main wire carrying the total current.
    pub fn set_trunk(&mut self, path: Path) {
        self.trunk = Some(PathAnimator::new(path, self.config.animator));
    }

    pub fn add_branch_animator(&mut self, id: BranchId, path: Path) -> SimResult<()> {
        if self.branch_animators.iter().any(|(b, _)| *b == id) {
            return Err(SimError::DuplicateBranch { branch: id });
        }
        self.branch_animators
            .push((id, PathAnimator::new(path, self.config.animator)));
        Ok(())
    }

    pub fn set_router(&mut self, router: FlowRouter) {
        self.router = Some(router);
    }

    pub fn trunk(&self) -> Option<&PathAnimator> {
        self.trunk.as_ref()
    }

    pub fn branch_animator(&self, id: BranchId) -> Option<&PathAnimator> {
        self.branch_animators
            .iter()
            .find(|(b, _)| *b == id)
            .map(|(_, a)| a)
    }

    pub fn branch_animators(&self) -> impl Iterator<Item = (BranchId, &PathAnimator)> {
        self.branch_animators.iter().map(|(b, a)| (*b, a))
    }

    pub fn router(&self) -> Option<&FlowRouter> {
        self.router.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn time(&self) -> Real {
        self.time
    }

    /// Push the total current to the trunk animator and router.
    pub fn set_total_current(&mut self, current: Real) {
        if let Some(trunk) = self.trunk.as_mut() {
            trunk.set_current_flow(current);
        }
        if let Some(router) = self.router.as_mut() {
            router.set_total_current(current);
        }
    }

    /// Push one branch's current to its animator, the router and live markers
    /// already travelling on that branch.
    ///
    /// A branch known to neither the animators nor the router is an error.
    pub fn set_branch_current(&mut self, id: BranchId, current: Real) -> SimResult<()> {
        let mut known = false;
        if let Some((_, anim)) = self.branch_animators.iter_mut().find(|(b, _)| *b == id) {
            anim.set_current_flow(current);
            known = true;
        }
        if let Some(router) = self.router.as_mut() {
            if router.set_branch_current(id, current).is_ok() {
                known = true;
            }
        }
        if !known {
            return Err(SimError::UnknownBranch { branch: id });
        }
        for marker in self.markers.iter_mut().filter(|m| m.branch == id) {
            marker.set_current_flow(current);
        }
        Ok(())
    }

    /// Advance the whole scene by `dt` seconds.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, dt: Real, rng: &mut R) -> SimResult<FrameReport> {
        validate_non_negative(dt, "dt")?;

        if let Some(trunk) = self.trunk.as_mut() {
            trunk.tick(dt);
        }
        for (_, anim) in self.branch_animators.iter_mut() {
            anim.tick(dt);
        }

        for marker in self.markers.iter_mut() {
            marker.tick(dt);
        }
        let lifetime = self.config.marker_lifetime;
        let before = self.markers.len();
        self.markers.retain(|m| !m.is_expired(lifetime));
        let mut expired = before - self.markers.len();

        let mut spawned = None;
        if let Some(event) = self.router.as_mut().and_then(|r| r.tick(dt, rng)) {
            let id = MarkerId::from_index(self.next_marker);
            self.next_marker = self.next_marker.wrapping_add(1);
            spawned = Some((id, event.branch));
            self.markers
                .push(Marker::spawn(id, event, self.config.animator));

            if self.markers.len() > self.config.max_markers {
                let excess = self.markers.len() - self.config.max_markers;
                self.markers.drain(..excess);
                expired += excess;
            }
        }

        self.time += dt;
        Ok(FrameReport {
            time: self.time,
            spawned,
            expired,
            live: self.markers.len(),
        })
    }
}
