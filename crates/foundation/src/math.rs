//! Scalar helpers shared by the camera and animation code.

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Fraction of `duration` covered by `elapsed`, clamped to `[0, 1]`.
///
/// A non-positive duration is treated as already complete.
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Wraps a bearing into `[0, 360)` degrees.
pub fn wrap_bearing_deg(bearing: f64) -> f64 {
    bearing.rem_euclid(360.0)
}

/// Wraps a longitude into `[-180, 180)` degrees.
pub fn wrap_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
