use crate::VfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for conservation checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-3,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, VfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(VfError::NonFinite { what, value: v })
    }
}

/// Raise `v` to at least `floor`. NaN collapses to `floor`.
#[inline]
pub fn floor_at(v: Real, floor: Real) -> Real {
    if v >= floor { v } else { floor }
}
