//! graybmp Core - 8-bit grayscale BMP processing
//!
//! This crate decodes 8-bit BMP files into an unpadded in-memory raster,
//! rotates it by quarter turns, smooths it with a 3x3 Gaussian kernel and
//! encodes the result back into valid BMP files.
//!
//! # Module Structure
//!
//! - `header` - The fixed 54-byte header record and row-stride arithmetic
//! - `buffer` - The [`PixelBuffer`] raster every transform works on
//! - `bitmap` - [`BmpImage`], the header, gap data and pixels of one file
//! - `decode` - BMP reading and validation
//! - `encode` - BMP writing with header recomputation and row padding
//! - `transform` - Lossless 90-degree rotation
//! - `filter` - Gaussian smoothing
//! - `pipeline` - The load / rotate / smooth / save batch process

pub mod bitmap;
pub mod buffer;
pub mod decode;
pub mod encode;
pub mod filter;
pub mod header;
pub mod pipeline;
pub mod transform;

pub use bitmap::BmpImage;
pub use buffer::PixelBuffer;
pub use decode::{decode_bmp, decode_bmp_bytes, load_bmp, DecodeError};
pub use encode::{encode_bmp, save_bmp, write_bmp, EncodeError};
pub use filter::apply_gaussian;
pub use header::BmpHeader;
pub use pipeline::{PipelineConfig, PipelineError, PipelineReport};
pub use transform::{rotate, rotate_ccw, rotate_cw, RotationDirection};
