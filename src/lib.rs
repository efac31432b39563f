//! Sobel edge detection
//!
//! Loads raster images, computes a Sobel edge map with the horizontal and
//! vertical gradients running concurrently, and writes the result next to
//! the input as `<name>_output.<ext>`. Python bindings via PyO3 and WASM
//! bindings for JavaScript are available behind features.
//!
//! ## Image Format
//! - **Input**: (height, width, 3) RGB u8, alpha dropped on decode
//! - **Gradients**: (height, width) i32, clamped to 0-255
//! - **Output**: (height, width, 3) u8 with R=G=B=edge strength
//!
//! ## Stages
//! `io::load_rgb` -> `filters::edge::sobel_gradients_u8` ->
//! `filters::edge::combine_magnitude_u8` -> `io::save_rgb`, driven per image
//! by [`pipeline::EdgePipeline`].

pub mod error;
pub mod filters;
pub mod io;
pub mod pipeline;
pub mod workspace;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{EdgeError, Result};
pub use filters::edge::BoundaryMode;
pub use pipeline::{detect_edges, EdgePipeline, ImageJob, PipelineConfig, ProcessReport, RunSummary};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::filters::edge::{self, BoundaryMode};
    use crate::filters::grayscale::grayscale_average_u8;

    fn parse_boundary(boundary: &str) -> PyResult<BoundaryMode> {
        boundary.parse().map_err(PyValueError::new_err)
    }

    fn check_rgb(image: &PyReadonlyArray3<'_, u8>) -> PyResult<()> {
        let channels = image.as_array().dim().2;
        if channels < 3 {
            return Err(PyValueError::new_err(format!(
                "expected an (H, W, 3) image, got {} channel(s)",
                channels
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Sobel edge map of an RGB u8 image.
    ///
    /// Output is (H, W, 3) with R=G=B=min(Gx + Gy, 255).
    ///
    /// # Arguments
    /// * `image` - Input image (H, W, 3)
    /// * `boundary` - "wrap" (default) or "interior"
    #[pyfunction]
    #[pyo3(signature = (image, boundary="wrap"))]
    pub fn sobel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        boundary: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mode = parse_boundary(boundary)?;
        check_rgb(&image)?;
        let result = edge::sobel_edges_u8(image.as_array(), mode);
        Ok(result.into_pyarray(py))
    }

    /// Gx and Gy fields as a pair of (H, W) int32 arrays.
    #[pyfunction]
    #[pyo3(signature = (image, boundary="wrap"))]
    pub fn sobel_gradients<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        boundary: &str,
    ) -> PyResult<(Bound<'py, PyArray2<i32>>, Bound<'py, PyArray2<i32>>)> {
        let mode = parse_boundary(boundary)?;
        check_rgb(&image)?;
        let gradients = edge::sobel_gradients_u8(image.as_array(), mode);
        Ok((gradients.gx.into_pyarray(py), gradients.gy.into_pyarray(py)))
    }

    // ========================================================================
    // Grayscale
    // ========================================================================

    /// Channel-average intensity plane (H, W) of an RGB u8 image.
    #[pyfunction]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<i32>>> {
        check_rgb(&image)?;
        Ok(grayscale_average_u8(image.as_array()).into_pyarray(py))
    }

    #[pymodule]
    pub fn sobel_edges(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(sobel, m)?)?;
        m.add_function(wrap_pyfunction!(sobel_gradients, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::sobel_edges;
