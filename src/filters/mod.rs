//! Filter modules for edge detection.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | Gradient field | (H, W) | i32 | Clamped gradient, 0-255 |
//!
//! ## Architecture
//!
//! - **Pure** - Inputs are borrowed views and never mutated
//! - **Integer math** - Intensities and gradients stay in i32 until the
//!   final u8 output
//! - **Thread-safe** - The two Sobel passes run on rayon as a fork-join pair

pub mod grayscale;
pub mod edge;
