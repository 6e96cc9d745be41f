//! 8-bit BMP decoding.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::DecodeError;
use crate::bitmap::BmpImage;
use crate::buffer::PixelBuffer;
use crate::header::{
    row_padding, BmpHeader, BMP_SIGNATURE, COMPRESSION_NONE, HEADER_SIZE,
    SUPPORTED_BITS_PER_PIXEL,
};

/// Geometry derived from a validated header.
struct Layout {
    width: u32,
    height: u32,
    gap_len: usize,
    padding: usize,
}

/// Decode an 8-bit BMP from a stream positioned at the start of the file.
///
/// Reads the header, validates it, reads the gap blob that runs up to
/// `data_offset`, then reads `height` rows of `width` samples, discarding
/// each row's padding. Bottom-up files (positive height) are flipped so the
/// returned buffer is always top-to-bottom.
///
/// The reader is consumed sequentially: once the gap has been read the
/// stream sits at `data_offset`, so no seeking is required.
///
/// # Errors
///
/// - `DecodeError::InvalidSignature` if the file doesn't start with "BM"
/// - `DecodeError::UnsupportedBitDepth` if bits per pixel is not 8
/// - `DecodeError::UnsupportedCompression` for compressed pixel data
/// - `DecodeError::InvalidHeader` for non-positive width, zero height or a
///   data offset inside the header
/// - `DecodeError::Truncated` if the stream ends early
/// - `DecodeError::Io` for any other read failure
pub fn decode_bmp<R: Read + ?Sized>(reader: &mut R) -> Result<BmpImage, DecodeError> {
    let header = read_header(reader)?;
    let layout = validate(&header)?;

    debug!(
        width = layout.width,
        height = layout.height,
        gap_len = layout.gap_len,
        padding = layout.padding,
        bottom_up = header.is_bottom_up(),
        "decoding BMP"
    );

    let mut gap = Vec::new();
    (&mut *reader)
        .take(layout.gap_len as u64)
        .read_to_end(&mut gap)
        .map_err(|e| DecodeError::from_read(e, "gap data"))?;
    if gap.len() != layout.gap_len {
        return Err(DecodeError::Truncated("gap data"));
    }

    let pixels = read_rows(reader, &layout)?;
    let pixels = if header.is_bottom_up() {
        flip_rows(&pixels, layout.width as usize)
    } else {
        pixels
    };

    Ok(BmpImage {
        header,
        gap,
        pixels: PixelBuffer::new(layout.width, layout.height, pixels),
    })
}

/// Decode an 8-bit BMP held in memory.
pub fn decode_bmp_bytes(bytes: &[u8]) -> Result<BmpImage, DecodeError> {
    let mut reader = bytes;
    decode_bmp(&mut reader)
}

/// Open and decode an 8-bit BMP file.
pub fn load_bmp<P: AsRef<Path>>(path: P) -> Result<BmpImage, DecodeError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "opened BMP for reading");
    decode_bmp(&mut BufReader::new(file))
}

/// Read the header record, rejecting a foreign signature as soon as the
/// first two bytes are in so short non-BMP input isn't reported as truncated.
fn read_header<R: Read + ?Sized>(reader: &mut R) -> Result<BmpHeader, DecodeError> {
    let mut bytes = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut bytes[..2])
        .map_err(|e| DecodeError::from_read(e, "header"))?;
    let signature = u16::from_le_bytes([bytes[0], bytes[1]]);
    if signature != BMP_SIGNATURE {
        return Err(DecodeError::InvalidSignature(signature));
    }
    reader
        .read_exact(&mut bytes[2..])
        .map_err(|e| DecodeError::from_read(e, "header"))?;
    Ok(BmpHeader::from_bytes(&bytes))
}

/// Check the header in the documented order: signature, bit depth,
/// compression, then geometry.
fn validate(header: &BmpHeader) -> Result<Layout, DecodeError> {
    if header.signature != BMP_SIGNATURE {
        return Err(DecodeError::InvalidSignature(header.signature));
    }
    if header.bits_per_pixel != SUPPORTED_BITS_PER_PIXEL {
        return Err(DecodeError::UnsupportedBitDepth(header.bits_per_pixel));
    }
    if header.compression != COMPRESSION_NONE {
        return Err(DecodeError::UnsupportedCompression(header.compression));
    }

    let width = header.pixel_width().ok_or_else(|| {
        DecodeError::InvalidHeader(format!("width must be positive, got {}", header.width))
    })?;
    let height = header
        .pixel_height()
        .ok_or_else(|| DecodeError::InvalidHeader("height must be non-zero".to_string()))?;
    let gap_len = header.gap_len().ok_or_else(|| {
        DecodeError::InvalidHeader(format!(
            "data offset {} lies inside the {HEADER_SIZE}-byte header",
            header.data_offset
        ))
    })?;
    if (width as usize).checked_mul(height as usize).is_none() {
        return Err(DecodeError::InvalidHeader(format!(
            "{width}x{height} image exceeds addressable memory"
        )));
    }

    Ok(Layout {
        width,
        height,
        gap_len,
        padding: row_padding(width, header.bits_per_pixel),
    })
}

/// Read `height` rows in file order, keeping `width` samples of each and
/// discarding the padding.
///
/// The buffer grows row by row so a header claiming a huge image fails on
/// the first missing row instead of allocating the whole raster up front.
fn read_rows<R: Read + ?Sized>(reader: &mut R, layout: &Layout) -> Result<Vec<u8>, DecodeError> {
    let width = layout.width as usize;
    let mut row = vec![0u8; width];
    // 8-bit rows never need more than 3 filler bytes.
    let mut padding = [0u8; 3];
    let mut pixels = Vec::new();

    for _ in 0..layout.height {
        reader
            .read_exact(&mut row)
            .map_err(|e| DecodeError::from_read(e, "pixel data"))?;
        reader
            .read_exact(&mut padding[..layout.padding])
            .map_err(|e| DecodeError::from_read(e, "row padding"))?;
        pixels.extend_from_slice(&row);
    }

    Ok(pixels)
}

/// Reverse the row order of an unpadded raster.
pub(crate) fn flip_rows(pixels: &[u8], width: usize) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    pixels
        .chunks_exact(width)
        .rev()
        .flatten()
        .copied()
        .collect()
}
