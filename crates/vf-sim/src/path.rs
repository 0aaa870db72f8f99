//! Shared waypoint paths.

use std::sync::Arc;

use nalgebra::Point3;
use vf_core::Real;

/// A point in scene space.
pub type Point = Point3<Real>;

/// Ordered waypoints a marker loops over.
///
/// Cloning a `Path` shares the waypoint storage; every marker spawned onto a
/// branch refers to the same slice. There is no way to mutate a path once
/// created.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Arc<[Point]>,
    loop_length: Real,
}

impl Path {
    pub fn new(points: Vec<Point>) -> Self {
        let loop_length = closed_length(&points);
        Self {
            points: points.into(),
            loop_length,
        }
    }

    /// Build from raw `[x, y, z]` triples (the project file format).
    pub fn from_coords(coords: &[[Real; 3]]) -> Self {
        Self::new(
            coords
                .iter()
                .map(|c| Point::new(c[0], c[1], c[2]))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Length of one full loop, including the closing segment back to the start.
    pub fn loop_length(&self) -> Real {
        self.loop_length
    }

    /// True if both paths refer to the same waypoint storage.
    pub fn shares_storage(&self, other: &Path) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

fn closed_length(points: &[Point]) -> Real {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| nalgebra::distance(&points[i], &points[(i + 1) % n]))
        .sum()
}
