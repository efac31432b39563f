//! Sobel edge detection on RGB u8 images.
//!
//! The image is reduced to one intensity plane up front. The two gradient
//! passes borrow that plane and write their own fields, so they run as a
//! fork-join pair on the rayon pool.
//!
//! ## Pipeline
//!
//! 1. **Gx** - row below minus row above, over strictly interior cells
//! 2. **Gy** - column right minus column left, range set by [`BoundaryMode`]
//! 3. **G** - `min(Gx + Gy, 255)` replicated into three channels
//!
//! Each gradient is clamped to 0-255 on its own before combination.
//! Cells outside a pass's range keep the zero they were allocated with.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use super::grayscale::grayscale_average_u8;

/// Largest value a gradient or combined magnitude may hold.
pub const MAX_EDGE: i32 = 255;

/// Which cells the vertical gradient (Gy) covers.
///
/// The horizontal gradient (Gx) always covers rows `1..=height-2` and
/// columns `1..=width-2` and is unaffected by this setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Rows `0..=height-2`, columns `0..=width-2`. A neighbour index of -1
    /// wraps to the last row or column.
    #[default]
    Wrap,
    /// Rows `1..=height-2`, columns `1..=width-2`, the same cells as Gx.
    Interior,
}

impl BoundaryMode {
    /// First row/column index Gy is evaluated at.
    fn start(self) -> usize {
        match self {
            BoundaryMode::Wrap => 0,
            BoundaryMode::Interior => 1,
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryMode::Wrap => f.write_str("wrap"),
            BoundaryMode::Interior => f.write_str("interior"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" => Ok(BoundaryMode::Wrap),
            "interior" => Ok(BoundaryMode::Interior),
            other => Err(format!(
                "unknown boundary mode '{}', expected 'wrap' or 'interior'",
                other
            )),
        }
    }
}

/// Horizontal and vertical gradient fields of one image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gradients {
    pub gx: Array2<i32>,
    pub gy: Array2<i32>,
}

/// Index one step before `i`, wrapping to `len - 1` at zero.
#[inline]
fn wrapped_prev(i: usize, len: usize) -> usize {
    (i + len - 1) % len
}

// ============================================================================
// Gradient Passes
// ============================================================================

/// Compute the horizontal gradient field Gx from an intensity plane.
///
/// # Arguments
/// * `gray` - Intensity plane of shape (height, width)
///
/// # Returns
/// Field of shape (height, width); border cells stay 0
pub fn sobel_gx(gray: ArrayView2<i32>) -> Array2<i32> {
    let (height, width) = gray.dim();
    let mut gx = Array2::<i32>::zeros((height, width));

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let below = gray[[y + 1, x - 1]] + gray[[y + 1, x]] + gray[[y + 1, x + 1]];
            let above = gray[[y - 1, x - 1]] + gray[[y - 1, x]] + gray[[y - 1, x + 1]];

            gx[[y, x]] = (below - above).clamp(0, MAX_EDGE);
        }
    }

    gx
}

/// Compute the vertical gradient field Gy from an intensity plane.
///
/// # Arguments
/// * `gray` - Intensity plane of shape (height, width)
/// * `mode` - Which cells are evaluated, see [`BoundaryMode`]
///
/// # Returns
/// Field of shape (height, width); cells outside the range stay 0
pub fn sobel_gy(gray: ArrayView2<i32>, mode: BoundaryMode) -> Array2<i32> {
    let (height, width) = gray.dim();
    let mut gy = Array2::<i32>::zeros((height, width));
    let start = mode.start();

    for y in start..height.saturating_sub(1) {
        let up = wrapped_prev(y, height);
        for x in start..width.saturating_sub(1) {
            let left = wrapped_prev(x, width);

            let right_col = gray[[up, x + 1]] + gray[[y, x + 1]] + gray[[y + 1, x + 1]];
            let left_col = gray[[up, left]] + gray[[y, left]] + gray[[y + 1, left]];

            gy[[y, x]] = (right_col - left_col).clamp(0, MAX_EDGE);
        }
    }

    gy
}

/// Gx of an RGB image of shape (height, width, 3).
pub fn sobel_gx_u8(input: ArrayView3<u8>) -> Array2<i32> {
    sobel_gx(grayscale_average_u8(input).view())
}

/// Gy of an RGB image of shape (height, width, 3).
pub fn sobel_gy_u8(input: ArrayView3<u8>, mode: BoundaryMode) -> Array2<i32> {
    sobel_gy(grayscale_average_u8(input).view(), mode)
}

/// Compute Gx and Gy concurrently and wait for both.
///
/// The intensity plane is built once up front; both passes borrow it.
pub fn sobel_gradients_u8(input: ArrayView3<u8>, mode: BoundaryMode) -> Gradients {
    let gray = grayscale_average_u8(input);
    let plane = gray.view();
    let (gx, gy) = rayon::join(|| sobel_gx(plane), || sobel_gy(plane, mode));
    Gradients { gx, gy }
}

/// Compute Gx then Gy on the calling thread.
pub fn sobel_gradients_sequential_u8(input: ArrayView3<u8>, mode: BoundaryMode) -> Gradients {
    let gray = grayscale_average_u8(input);
    let gx = sobel_gx(gray.view());
    let gy = sobel_gy(gray.view(), mode);
    Gradients { gx, gy }
}

// ============================================================================
// Magnitude
// ============================================================================

/// Merge Gx and Gy into an RGB edge image.
///
/// `G = Gx + Gy`, capped at 255, written to all three channels. Inputs
/// produced by the gradient passes are never negative; any negative cell
/// from elsewhere is floored at 0 instead of wrapping.
///
/// # Panics
/// If `gx` and `gy` differ in shape.
pub fn combine_magnitude_u8(gx: &Array2<i32>, gy: &Array2<i32>) -> Array3<u8> {
    assert_eq!(
        gx.dim(),
        gy.dim(),
        "gradient fields must share the image dimensions"
    );
    let (height, width) = gx.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let g = (gx[[y, x]] + gy[[y, x]]).clamp(0, MAX_EDGE) as u8;
            output[[y, x, 0]] = g;
            output[[y, x, 1]] = g;
            output[[y, x, 2]] = g;
        }
    }

    output
}

/// Full in-memory edge detection: both gradients, then the magnitude.
///
/// # Arguments
/// * `input` - RGB image of shape (height, width, 3)
/// * `mode` - Boundary handling for Gy
///
/// # Returns
/// Grayscale-as-RGB edge image of shape (height, width, 3)
pub fn sobel_edges_u8(input: ArrayView3<u8>, mode: BoundaryMode) -> Array3<u8> {
    let Gradients { gx, gy } = sobel_gradients_u8(input, mode);
    combine_magnitude_u8(&gx, &gy)
}
