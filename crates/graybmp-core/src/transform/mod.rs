//! Geometric transforms on [`PixelBuffer`](crate::PixelBuffer).
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, `x` grows right, `y` grows down
//! - Only quarter turns are supported; every pixel is remapped and none is
//!   dropped or interpolated
//! - Transforms allocate a new buffer and never touch their input

mod rotation;

pub use rotation::{rotate, rotate_ccw, rotate_cw, RotationDirection};
