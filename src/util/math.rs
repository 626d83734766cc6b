//! Angle and range helpers shared by the dynamics and the camera.

use std::f64::consts::{PI, TAU};

/// Wrap `value` into `[0, max)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `max`, which
/// is folded back to 0 so the half-open interval holds.
#[inline]
#[must_use]
pub fn wrap(value: f64, max: f64) -> f64 {
    let wrapped = value.rem_euclid(max);
    if wrapped >= max {
        0.0
    } else {
        wrapped
    }
}

/// Signed delta to go from `from` to `to` (both in `[0, 2π)`) taking the
/// shortest way around the circle.
#[must_use]
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    [0.0, TAU, -TAU]
        .iter()
        .map(|offset| to - from + offset)
        .fold(f64::INFINITY, |best, candidate| {
            if candidate.abs() < best.abs() {
                candidate
            } else {
                best
            }
        })
}

/// Great-circle angle in radians between two (yaw, pitch) directions.
#[must_use]
pub fn angle_between(yaw1: f64, pitch1: f64, yaw2: f64, pitch2: f64) -> f64 {
    let cos = pitch1.cos() * pitch2.cos() * (yaw1 - yaw2).cos()
        + pitch1.sin() * pitch2.sin();
    // acos of a value a hair above 1 is NaN
    cos.clamp(-1.0, 1.0).acos()
}

/// Map a logical zoom level (0 = widest, 100 = narrowest) to a vertical
/// field of view in degrees.
#[inline]
#[must_use]
pub fn zoom_level_to_fov(level: f64, min_fov: f64, max_fov: f64) -> f64 {
    max_fov + (level / 100.0) * (min_fov - max_fov)
}

/// Inverse of [`zoom_level_to_fov`].
#[inline]
#[must_use]
pub fn fov_to_zoom_level(fov: f64, min_fov: f64, max_fov: f64) -> f64 {
    if (min_fov - max_fov).abs() < f64::EPSILON {
        return 0.0;
    }
    ((fov - max_fov) / (min_fov - max_fov) * 100.0).clamp(0.0, 100.0)
}

/// Horizontal field of view (degrees) for a vertical one and an aspect
/// ratio.
#[must_use]
pub fn vfov_to_hfov(vfov: f64, aspect: f64) -> f64 {
    (2.0 * ((vfov.to_radians() / 2.0).tan() * aspect).atan()).to_degrees()
}

/// Quarter turn, the pitch limit.
pub const HALF_PI: f64 = PI / 2.0;
