//! Marker motion along a looping path.

use vf_core::Real;

use crate::error::{SimError, SimResult};
use crate::path::{Path, Point};

pub const DEFAULT_SPEED_FACTOR: Real = 0.5;
pub const DEFAULT_ARRIVAL_TOLERANCE: Real = 0.001;
pub const DEFAULT_MIN_SPEED: Real = 0.001;

/// Tuning for [`PathAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorConfig {
    /// Scene units per second per ampere.
    pub speed_factor: Real,
    /// Distance under which a waypoint counts as reached.
    pub arrival_tolerance: Real,
    /// Speeds below this freeze the marker in place.
    pub min_speed: Real,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            speed_factor: DEFAULT_SPEED_FACTOR,
            arrival_tolerance: DEFAULT_ARRIVAL_TOLERANCE,
            min_speed: DEFAULT_MIN_SPEED,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.speed_factor.is_finite() || self.speed_factor < 0.0 {
            return Err(SimError::InvalidArg {
                what: "speed_factor must be finite and non-negative",
            });
        }
        if !self.arrival_tolerance.is_finite() || self.arrival_tolerance <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "arrival_tolerance must be positive",
            });
        }
        if !self.min_speed.is_finite() || self.min_speed < 0.0 {
            return Err(SimError::InvalidArg {
                what: "min_speed must be finite and non-negative",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    /// No tick has moved the marker yet; it has no position.
    Unplaced,
    /// Placed on the path and looping.
    Moving,
}

/// Moves one marker around a [`Path`] at `|current| * speed_factor`.
///
/// The first effective tick snaps the marker to waypoint 0 and aims it at
/// waypoint 1. Distance left over after reaching a waypoint within a tick
/// carries onto the next segment, so travelled distance always equals
/// `speed * elapsed`. Reaching waypoint 0 again completes a lap.
#[derive(Debug, Clone)]
pub struct PathAnimator {
    path: Path,
    config: AnimatorConfig,
    current_flow: Real,
    position: Option<Point>,
    target: usize,
    laps: u64,
}

impl PathAnimator {
    pub fn new(path: Path, config: AnimatorConfig) -> Self {
        Self {
            path,
            config,
            current_flow: 0.0,
            position: None,
            target: 0,
            laps: 0,
        }
    }

    pub fn with_current(mut self, current: Real) -> Self {
        self.set_current_flow(current);
        self
    }

    /// Store the current used for the next tick's speed. Not retroactive.
    pub fn set_current_flow(&mut self, current: Real) {
        self.current_flow = current;
    }

    pub fn current_flow(&self) -> Real {
        self.current_flow
    }

    pub fn speed(&self) -> Real {
        self.current_flow.abs() * self.config.speed_factor
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn state(&self) -> AnimatorState {
        if self.position.is_some() {
            AnimatorState::Moving
        } else {
            AnimatorState::Unplaced
        }
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Index of the waypoint the marker is heading to.
    pub fn target_index(&self) -> usize {
        self.target
    }

    pub fn laps_completed(&self) -> u64 {
        self.laps
    }

    /// Advance by `dt` seconds and return the resulting position.
    ///
    /// No-op for an empty path, a non-positive `dt`, or a speed under
    /// `min_speed`; a no-op tick neither places the marker nor moves its
    /// waypoint index.
    pub fn tick(&mut self, dt: Real) -> Option<Point> {
        if self.path.is_empty() || !(dt > 0.0) {
            return self.position;
        }

        let speed = self.speed();
        if !(speed > 0.0 && speed >= self.config.min_speed) {
            return self.position;
        }
        let mut budget = speed * dt;
        if !budget.is_finite() {
            return self.position;
        }

        let path = self.path.clone();
        let points = path.points();
        let n = points.len();

        let mut pos = match self.position {
            Some(p) => p,
            None => {
                self.target = 1 % n;
                points[0]
            }
        };

        if n == 1 {
            self.position = Some(pos);
            return self.position;
        }

        // Whole loops end where they started and pass waypoint 0 once each.
        let loop_length = path.loop_length();
        if loop_length > 0.0 && budget >= loop_length {
            let whole = (budget / loop_length).floor();
            self.laps = self.laps.saturating_add(whole as u64);
            budget = (budget - whole * loop_length).max(0.0);
        }

        let tol = self.config.arrival_tolerance;
        let mut idle_hops = 0;

        loop {
            let to_target = points[self.target] - pos;
            let dist = to_target.norm();

            if dist > budget {
                pos += to_target * (budget / dist);
                if dist - budget < tol {
                    self.arrive(n);
                }
                break;
            }

            pos = points[self.target];
            budget -= dist;
            self.arrive(n);

            // Coincident waypoints consume no budget; stop after a full idle lap.
            if dist > 0.0 {
                idle_hops = 0;
            } else {
                idle_hops += 1;
                if idle_hops >= n {
                    break;
                }
            }
            if budget <= 0.0 {
                break;
            }
        }

        self.position = Some(pos);
        self.position
    }

    fn arrive(&mut self, n: usize) {
        if self.target == 0 {
            self.laps += 1;
        }
        self.target = (self.target + 1) % n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Path {
        Path::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])
    }

    #[test]
    fn first_tick_places_at_start() {
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(2.0);
        assert_eq!(anim.state(), AnimatorState::Unplaced);
        assert!(anim.position().is_none());

        let pos = anim.tick(0.25).unwrap();
        assert_eq!(anim.state(), AnimatorState::Moving);
        assert!((pos.x - 0.25).abs() < 1e-12);
        assert_eq!(anim.target_index(), 1);
    }

    #[test]
    fn empty_path_is_noop() {
        let mut anim = PathAnimator::new(Path::empty(), AnimatorConfig::default()).with_current(5.0);
        assert!(anim.tick(1.0).is_none());
        assert_eq!(anim.state(), AnimatorState::Unplaced);
    }

    #[test]
    fn below_min_speed_is_noop() {
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(0.0);
        assert!(anim.tick(1.0).is_none());
        assert_eq!(anim.state(), AnimatorState::Unplaced);

        anim.set_current_flow(2.0);
        anim.tick(0.1);
        let placed = anim.position();
        let target = anim.target_index();

        anim.set_current_flow(0.0015); // speed 0.00075 < 0.001
        assert_eq!(anim.tick(10.0), placed);
        assert_eq!(anim.target_index(), target);
    }

    #[test]
    fn current_change_applies_on_next_tick() {
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(0.2);
        anim.tick(1.0);
        let x0 = anim.position().unwrap().x;
        assert!((x0 - 0.1).abs() < 1e-12);

        anim.set_current_flow(1.0);
        assert_eq!(anim.position().unwrap().x, x0);
        anim.tick(1.0);
        assert!((anim.position().unwrap().x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn negative_current_moves_by_magnitude() {
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(-2.0);
        anim.tick(0.5);
        assert!((anim.position().unwrap().x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn leftover_distance_carries_past_waypoint() {
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(2.0);
        // speed 1: 1.25 units = reach (1,0,0) then 0.25 back toward start
        let pos = anim.tick(1.25).unwrap();
        assert!((pos.x - 0.75).abs() < 1e-12);
        assert_eq!(anim.target_index(), 0);
        assert_eq!(anim.laps_completed(), 0);
    }

    #[test]
    fn single_waypoint_stays_put() {
        let path = Path::from_coords(&[[3.0, 4.0, 5.0]]);
        let mut anim = PathAnimator::new(path, AnimatorConfig::default()).with_current(1.0);
        let pos = anim.tick(10.0).unwrap();
        assert_eq!(pos, Point::new(3.0, 4.0, 5.0));
        assert_eq!(anim.laps_completed(), 0);
    }

    #[test]
    fn coincident_waypoints_terminate() {
        let path = Path::from_coords(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        let mut anim = PathAnimator::new(path, AnimatorConfig::default()).with_current(1.0);
        let pos = anim.tick(1.0).unwrap();
        assert_eq!(pos, Point::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn huge_dt_returns_promptly() {
        // speed 1, loop length 2
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(2.0);
        let pos = anim.tick(1e10).unwrap();
        assert_eq!(anim.laps_completed(), 5_000_000_000);
        assert!(pos.x.abs() < 1e-6);

        let before = anim.position();
        let laps = anim.laps_completed();
        assert_eq!(anim.tick(f64::INFINITY), before);
        assert_eq!(anim.laps_completed(), laps);
    }

    #[test]
    fn whole_loops_are_counted_from_mid_path() {
        let mut anim = PathAnimator::new(line(), AnimatorConfig::default()).with_current(2.0);
        anim.tick(0.5);
        // 0.5 into the first segment, then 3 full loops of length 2 plus 0.25
        let pos = anim.tick(6.25).unwrap();
        assert!((pos.x - 0.75).abs() < 1e-9);
        assert_eq!(anim.laps_completed(), 3);
        assert_eq!(anim.target_index(), 1);
    }

    #[test]
    fn config_validation() {
        assert!(AnimatorConfig::default().validate().is_ok());
        let bad = AnimatorConfig {
            arrival_tolerance: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = AnimatorConfig {
            speed_factor: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
