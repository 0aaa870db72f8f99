//! Random sources for branch routing.
//!
//! The router only needs uniform draws in `[0, 1)`. Keeping that behind a
//! trait lets tests replay exact sequences and lets batch runs be reproduced
//! from a seed.

use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use vf_core::Real;

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> Real;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> Real {
        (**self).next_unit()
    }
}

/// `StdRng`-backed source, reproducible when seeded.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
    unit: Uniform<Real>,
}

impl SeededRandom {
    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            unit: Uniform::new(0.0, 1.0),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> Real {
        self.unit.sample(&mut self.rng)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty list always yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: Vec<Real>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<Real>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> Real {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        if v.is_nan() {
            0.0
        } else {
            v.clamp(0.0, 1.0 - Real::EPSILON)
        }
    }
}
