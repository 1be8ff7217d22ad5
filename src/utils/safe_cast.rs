//! Checked numeric conversions between `OpenCV` coordinates and tensor dimensions

use crate::{Error, Result};

/// Convert an `OpenCV` dimension to a tensor dimension
///
/// # Errors
///
/// Returns an error if the value is negative
pub fn i32_to_usize(value: i32) -> Result<usize> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Negative dimension {value}")))
}

/// Truncate an `f32` to an `i32` clamped into `[min, max]`
///
/// Non-finite input maps to `min`. Bounds given in the wrong order are swapped.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Bounds only need to be approximate in f32
#[allow(clippy::cast_possible_truncation)] // Value is clamped before the cast
pub fn f32_to_i32_clamp(value: f32, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.clamp(min as f32, max as f32) as i32;
    clamped.clamp(min, max)
}
