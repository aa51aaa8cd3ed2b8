use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Wraps an angle into `(-π, π]`.
///
/// Used for every heading error computation; raw headings themselves are
/// allowed to grow without bound.
///
/// # Example
///
/// ```
/// use std::f64::consts::PI;
/// use airrace_engine::ang_wrap;
///
/// assert!((ang_wrap(3.0 * PI) - PI).abs() < 1e-9);
/// assert!((ang_wrap(-PI / 2.0) + PI / 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn ang_wrap(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Unit vector pointing along `angle`.
#[must_use]
pub fn heading_vector(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Absolute angle of the line of sight from `from` to `to`.
#[must_use]
pub fn bearing(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}
