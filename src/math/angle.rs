//! Angle range helpers.

use std::f64::consts::{PI, TAU};

/// Wraps an angle in radians into `(-π, π]`.
#[must_use]
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Smallest signed difference `a - b` between two angles, in `(-π, π]`.
#[must_use]
pub fn angle_difference(a: f64, b: f64) -> f64 {
    wrap_angle(a - b)
}
