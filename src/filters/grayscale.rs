//! Grayscale sampling for edge detection.
//!
//! Intensity is the plain average of the three color channels with integer
//! truncation, not a luminosity-weighted conversion.
//!
//! ## Range
//!
//! - Input: u8 channels (0-255)
//! - Output: i32 intensity (0-255), kept signed so gradient sums can go
//!   negative before clamping

use ndarray::{Array2, ArrayView3};

/// Average an (r, g, b) triple into a single intensity.
///
/// Truncating division, so `(1, 1, 0)` maps to `0`.
#[inline]
pub fn grayscale_average(r: u8, g: u8, b: u8) -> i32 {
    (r as i32 + g as i32 + b as i32) / 3
}

/// Convert an RGB u8 image to an intensity plane.
///
/// # Arguments
/// * `input` - Image of shape (height, width, 3); extra channels are ignored
///
/// # Returns
/// Intensity plane of shape (height, width)
pub fn grayscale_average_u8(input: ArrayView3<u8>) -> Array2<i32> {
    let (height, width, channels) = input.dim();
    assert!(
        channels >= 3,
        "grayscale sampling needs 3 color channels, got {}",
        channels
    );

    let mut output = Array2::<i32>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            output[[y, x]] = grayscale_average(
                input[[y, x, 0]],
                input[[y, x, 1]],
                input[[y, x, 2]],
            );
        }
    }

    output
}
