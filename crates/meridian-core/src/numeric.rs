//! Shared clamping, rounding and angle helpers.
//!
//! Every module that clamps an index, a zoom factor or a point, or that
//! normalizes an angle, goes through these functions so the edge-case
//! semantics are identical across the transform, geometry, viewport and MPR
//! code.

/// Clamp `value` into `[min, max]`.
///
/// If `min > max` the range is treated as collapsed onto `min`.
pub fn clamp<T: PartialOrd + Copy>(value: T, min: T, max: T) -> T {
    if min > max {
        return min;
    }
    num_traits::clamp(value, min, max)
}

/// Clamp a signed index into `[0, len - 1]`. An empty axis clamps to 0.
pub fn clamp_index(value: i64, len: usize) -> usize {
    let max = len.saturating_sub(1) as i64;
    clamp(value, 0, max) as usize
}

/// Map a fraction in `[0, 1]` onto the nearest index of an axis of `len`
/// samples. The fraction is clamped first.
pub fn fraction_to_index(fraction: f64, len: usize) -> usize {
    let max = len.saturating_sub(1);
    if !fraction.is_finite() {
        return 0;
    }
    let f = clamp(fraction, 0.0, 1.0);
    (f * max as f64).round() as usize
}

/// Position of `index` along an axis of `len` samples as a percentage.
/// Axes with fewer than two samples report 0.
pub fn index_to_percent(index: usize, len: usize) -> f64 {
    if len <= 1 {
        return 0.0;
    }
    index as f64 / (len - 1) as f64 * 100.0
}

/// Normalize degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can land on 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Absolute-tolerance float comparison.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}
