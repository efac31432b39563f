//! WebAssembly exports for Sobel edge detection.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and work on
//! flat, row-major RGB byte buffers (3 bytes per pixel).

use wasm_bindgen::prelude::*;
use ndarray::Array3;

use crate::filters::edge::{sobel_edges_u8, BoundaryMode};

fn rgb_array(data: &[u8], width: usize, height: usize) -> Result<Array3<u8>, JsValue> {
    Array3::from_shape_vec((height, width, 3), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("invalid RGB buffer for {}x{}: {}", width, height, e)))
}

/// Sobel edge map of an RGB image.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `boundary` - "wrap" or "interior"
///
/// # Returns
/// Flat array of RGB bytes with R=G=B=edge strength
#[wasm_bindgen]
pub fn sobel_edges_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    boundary: &str,
) -> Result<Vec<u8>, JsValue> {
    let mode: BoundaryMode = boundary.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let input = rgb_array(data, width, height)?;

    let result = sobel_edges_u8(input.view(), mode);
    Ok(result.into_raw_vec_and_offset().0)
}
