//! A decoded BMP: header, gap data and pixels travelling together.

use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::decode::{load_bmp, DecodeError};
use crate::encode::{save_bmp, EncodeError};
use crate::filter::apply_gaussian;
use crate::header::{grayscale_palette, BmpHeader, HEADER_SIZE};
use crate::transform::{rotate, RotationDirection};

/// An 8-bit BMP image as loaded from (or destined for) disk.
///
/// The header and gap are carried through every transform. Only width,
/// height and file size are ever recomputed; the pixel buffer is replaced
/// rather than mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpImage {
    /// The 54-byte header as read from the source file.
    pub header: BmpHeader,
    /// Bytes between the header and the pixel data, copied through verbatim.
    pub gap: Vec<u8>,
    /// Unpadded pixels, top row first.
    pub pixels: PixelBuffer,
}

impl BmpImage {
    /// Wrap a raster in a fresh bottom-up 8-bit header with a gray palette.
    pub fn new_grayscale(pixels: PixelBuffer) -> Self {
        let gap = grayscale_palette();
        let header = BmpHeader::grayscale(pixels.width, pixels.height, gap.len());
        Self { header, gap, pixels }
    }

    /// Load an 8-bit BMP from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        load_bmp(path)
    }

    /// Save to disk, recomputing the header for the current dimensions.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<u64, EncodeError> {
        save_bmp(path, self)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    /// Rotate by 90 degrees in `direction`.
    ///
    /// The returned header has width and height swapped and its file size
    /// set to header + gap + unpadded pixel count; the encoder re-derives
    /// the padded size when the image is written.
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let pixels = rotate(&self.pixels, direction);
        let mut header = self.header;
        header.width = pixels.width as i32;
        header.height = if self.header.height < 0 {
            -(pixels.height as i32)
        } else {
            pixels.height as i32
        };
        header.file_size = (HEADER_SIZE + self.gap.len() + pixels.pixel_count()) as u32;

        Self {
            header,
            gap: self.gap.clone(),
            pixels,
        }
    }

    /// Apply the 3x3 Gaussian smoothing pass.
    pub fn smoothed(&self) -> Self {
        Self {
            header: self.header,
            gap: self.gap.clone(),
            pixels: apply_gaussian(&self.pixels),
        }
    }
}
