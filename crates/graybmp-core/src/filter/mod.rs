//! Convolution filters on [`PixelBuffer`](crate::PixelBuffer).
//!
//! ## Border Handling
//!
//! Filters only write pixels whose whole neighbourhood lies inside the
//! raster. Edge rows and columns are copied from the input unchanged; there
//! is no clamping, mirroring or wraparound.

mod gaussian;

pub use gaussian::{apply_gaussian, GAUSSIAN_KERNEL, KERNEL_WEIGHT};
