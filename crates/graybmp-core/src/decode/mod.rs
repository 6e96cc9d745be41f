//! BMP decoding.
//!
//! This module provides functionality for:
//! - Reading and validating the fixed 54-byte header
//! - Capturing the opaque gap between the header and the pixel data
//! - Reading 8-bit pixel rows into an unpadded, top-to-bottom [`PixelBuffer`]
//!
//! Row padding is a file concern only: it is skipped while reading and
//! never reaches the in-memory buffer.
//!
//! # Examples
//!
//! ```ignore
//! use graybmp_core::decode::load_bmp;
//!
//! let image = load_bmp("Picture.bmp").unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```
//!
//! [`PixelBuffer`]: crate::PixelBuffer

mod bmp;
mod types;

pub use bmp::{decode_bmp, decode_bmp_bytes, load_bmp};
pub use types::DecodeError;
