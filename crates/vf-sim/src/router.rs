//! Current-weighted marker routing at a junction.
//!
//! The router spawns markers at a cadence proportional to total current and
//! sends each one down a branch with probability `|Iᵢ| / Σ|I|`. Over many
//! spawns the per-branch frequencies follow the current split, which is the
//! visual form of Kirchhoff's current law.

use std::collections::HashSet;

use vf_core::{BranchId, Real};

use crate::error::{SimError, SimResult};
use crate::path::Path;
use crate::random::RandomSource;

/// Total currents below this are not routed.
pub const DEFAULT_MIN_CURRENT: Real = 0.001;
/// Floor for the total current when computing the spawn interval.
pub const DEFAULT_MIN_RATE: Real = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterConfig {
    pub min_current: Real,
    pub min_rate: Real,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            min_current: DEFAULT_MIN_CURRENT,
            min_rate: DEFAULT_MIN_RATE,
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.min_current.is_finite() || self.min_current < 0.0 {
            return Err(SimError::InvalidArg {
                what: "min_current must be finite and non-negative",
            });
        }
        if !self.min_rate.is_finite() || self.min_rate <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "min_rate must be positive",
            });
        }
        Ok(())
    }
}

#[inline]
fn weight(current: Real) -> Real {
    if current.is_finite() { current.abs() } else { 0.0 }
}

/// Pick a branch by inverse-CDF sampling over current magnitudes.
///
/// Branches are walked in the given order; the first whose cumulative share
/// reaches the draw wins. Zero-weight branches are never selected. Returns
/// `None` without drawing when there is no current to route.
pub fn select_branch<R: RandomSource + ?Sized>(
    branches: &[(BranchId, Real)],
    rng: &mut R,
) -> Option<BranchId> {
    let total: Real = branches.iter().map(|(_, i)| weight(*i)).sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }

    let r = rng.next_unit();
    let mut cumulative = 0.0;
    let mut last = None;
    for &(id, current) in branches {
        let w = weight(current);
        if w <= 0.0 {
            continue;
        }
        last = Some(id);
        cumulative += w / total;
        if r <= cumulative {
            return Some(id);
        }
    }
    // Rounding can leave the final cumulative a hair under 1.
    last
}

/// One outgoing branch at the junction.
#[derive(Debug, Clone)]
pub struct RouteBranch {
    pub id: BranchId,
    pub current: Real,
    pub path: Path,
}

impl RouteBranch {
    pub fn new(id: BranchId, path: Path) -> Self {
        Self {
            id,
            current: 0.0,
            path,
        }
    }
}

/// A routing decision: spawn a marker on `path` moving at `current`.
#[derive(Debug, Clone)]
pub struct SpawnEvent {
    pub branch: BranchId,
    pub current: Real,
    pub path: Path,
}

/// Junction router with a current-driven spawn timer.
#[derive(Debug, Clone)]
pub struct FlowRouter {
    branches: Vec<RouteBranch>,
    total_current: Real,
    spawn_timer: Real,
    config: RouterConfig,
}

impl FlowRouter {
    pub fn new(branches: Vec<RouteBranch>, config: RouterConfig) -> SimResult<Self> {
        config.validate()?;
        if branches.is_empty() {
            return Err(SimError::InvalidArg {
                what: "router needs at least one branch",
            });
        }
        let mut seen = HashSet::new();
        for b in &branches {
            if !seen.insert(b.id) {
                return Err(SimError::DuplicateBranch { branch: b.id });
            }
        }
        Ok(Self {
            branches,
            total_current: 0.0,
            spawn_timer: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn branches(&self) -> &[RouteBranch] {
        &self.branches
    }

    pub fn total_current(&self) -> Real {
        self.total_current
    }

    /// Refresh the total current entering the junction.
    pub fn set_total_current(&mut self, current: Real) {
        self.total_current = current;
    }

    pub fn set_branch_current(&mut self, id: BranchId, current: Real) -> SimResult<()> {
        let branch = self
            .branches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(SimError::UnknownBranch { branch: id })?;
        branch.current = current;
        Ok(())
    }

    /// (branch, current) pairs in routing order.
    pub fn branch_currents(&self) -> Vec<(BranchId, Real)> {
        self.branches.iter().map(|b| (b.id, b.current)).collect()
    }

    /// Seconds between spawns at the present total current.
    pub fn spawn_interval(&self) -> Real {
        1.0 / weight(self.total_current).max(self.config.min_rate)
    }

    pub fn spawn_timer(&self) -> Real {
        self.spawn_timer
    }

    fn routable(&self) -> bool {
        let entering: Real = self.branches.iter().map(|b| weight(b.current)).sum();
        weight(self.total_current) >= self.config.min_current
            && entering >= self.config.min_current
    }

    /// Advance the spawn timer; emit at most one routed spawn.
    ///
    /// With no routable current the timer is held at zero, so spawning resumes
    /// on the first tick after current returns.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, dt: Real, rng: &mut R) -> Option<SpawnEvent> {
        if !dt.is_finite() || dt < 0.0 {
            return None;
        }

        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return None;
        }

        if !self.routable() {
            self.spawn_timer = 0.0;
            return None;
        }

        let pairs = self.branch_currents();
        let chosen = select_branch(&pairs, rng);
        self.spawn_timer = self.spawn_interval();

        let id = chosen?;
        let branch = self.branches.iter().find(|b| b.id == id)?;
        tracing::debug!(branch = %id, current = branch.current, "routed spawn");
        Some(SpawnEvent {
            branch: id,
            current: branch.current,
            path: branch.path.clone(),
        })
    }
}
