//! Headless playback: tick a controller's flow scene over a fixed horizon.

use vf_core::Real;
use vf_sim::SeededRandom;

use crate::controller::CircuitController;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    /// Fixed time step (seconds)
    pub dt: Real,
    /// Final playback time (seconds)
    pub t_end: Real,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Router seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            t_end: 10.0,
            max_steps: 100_000,
            record_every: 6,
            seed: None,
        }
    }
}

impl PlaybackOptions {
    pub fn validate(&self) -> AppResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(AppError::InvalidInput("dt must be positive".to_string()));
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(AppError::InvalidInput(
                "t_end must be non-negative".to_string(),
            ));
        }
        if self.max_steps == 0 {
            return Err(AppError::InvalidInput(
                "max_steps must be positive".to_string(),
            ));
        }
        if self.record_every == 0 {
            return Err(AppError::InvalidInput(
                "record_every must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackFrame {
    pub t: Real,
    pub live_markers: usize,
    /// Trunk marker position, once placed.
    pub trunk_position: Option<[Real; 3]>,
    /// Lap count of the trunk marker.
    pub trunk_laps: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRecord {
    pub frames: Vec<PlaybackFrame>,
    pub steps: usize,
    /// Routed spawns per resistor key, in control order.
    pub spawn_counts: Vec<(String, usize)>,
}

impl PlaybackRecord {
    pub fn total_spawns(&self) -> usize {
        self.spawn_counts.iter().map(|(_, n)| n).sum()
    }

    /// Fraction of routed spawns that went to `key`.
    pub fn spawn_share(&self, key: &str) -> Option<Real> {
        let total = self.total_spawns();
        if total == 0 {
            return None;
        }
        self.spawn_counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, n)| *n as Real / total as Real)
    }
}

fn frame(controller: &CircuitController) -> PlaybackFrame {
    let flow = controller.flow();
    let trunk = flow.trunk();
    PlaybackFrame {
        t: flow.time(),
        live_markers: flow.markers().len(),
        trunk_position: trunk
            .and_then(|a| a.position())
            .map(|p| [p.x, p.y, p.z]),
        trunk_laps: trunk.map(|a| a.laps_completed()).unwrap_or(0),
    }
}

/// Run the controller's scene from its present state until `t_end`.
pub fn run_playback(
    controller: &mut CircuitController,
    opts: &PlaybackOptions,
) -> AppResult<PlaybackRecord> {
    opts.validate()?;

    tracing::info!(
        scene = %controller.scene_id(),
        dt = opts.dt,
        t_end = opts.t_end,
        seed = ?opts.seed,
        "playback started"
    );

    let mut rng = SeededRandom::new(opts.seed);
    let mut spawn_counts: Vec<(String, usize)> = controller
        .controls()
        .iter()
        .map(|c| (c.key.clone(), 0))
        .collect();

    let t0 = controller.flow().time();
    let mut frames = vec![frame(controller)];
    let mut step = 0;
    while step < opts.max_steps && (step as Real) * opts.dt < opts.t_end {
        let report = controller.tick(opts.dt, &mut rng)?;
        step += 1;

        if let Some((_, branch)) = report.spawned {
            if let Some(slot) = controller.controls().iter().position(|c| c.id == branch) {
                spawn_counts[slot].1 += 1;
            }
        }

        if step % opts.record_every == 0 {
            frames.push(frame(controller));
        }
    }

    tracing::info!(
        scene = %controller.scene_id(),
        steps = step,
        t = controller.flow().time() - t0,
        spawns = spawn_counts.iter().map(|(_, n)| n).sum::<usize>(),
        "playback finished"
    );

    Ok(PlaybackRecord {
        frames,
        steps: step,
        spawn_counts,
    })
}
