//! BMP encoding.
//!
//! This module provides functionality for:
//! - Recomputing the header for the buffer's current dimensions
//! - Writing header, gap data and padded pixel rows
//! - Saving atomically through a temporary file
//!
//! # Examples
//!
//! ```ignore
//! use graybmp_core::{BmpImage, PixelBuffer};
//! use graybmp_core::encode::encode_bmp;
//!
//! let image = BmpImage::new_grayscale(PixelBuffer::filled(100, 100, 128));
//! let bytes = encode_bmp(&image).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod bmp;

pub use bmp::{encode_bmp, encoded_header, save_bmp, write_bmp, EncodeError};
