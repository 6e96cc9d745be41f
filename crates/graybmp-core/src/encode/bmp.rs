//! 8-bit BMP encoding.
//!
//! The on-disk layout is rebuilt from the buffer on every write: width and
//! height come from the buffer, each row is followed by zero bytes up to the
//! 4-byte stride, and `file_size` is header + gap + stride * height. Row
//! order follows the header's height sign, as on read.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::bitmap::BmpImage;
use crate::header::{row_padding, row_stride, BmpHeader, HEADER_SIZE, SUPPORTED_BITS_PER_PIXEL};

/// Errors that can occur during BMP encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the buffer's dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero or too large for the header fields.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero and fit the header")]
    InvalidDimensions { width: u32, height: u32 },

    /// The header declares a bit depth other than 8.
    #[error("Unsupported bit depth: {0} bits per pixel, expected {bpp}", bpp = SUPPORTED_BITS_PER_PIXEL)]
    UnsupportedBitDepth(u16),

    /// I/O error while writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Compute the header that will be written for `image`.
///
/// # Errors
///
/// Returns `EncodeError::UnsupportedBitDepth` unless the header says 8 bits
/// per pixel, `EncodeError::InvalidDimensions` for an empty raster or one whose
/// file size would overflow the 32-bit header fields, and
/// `EncodeError::InvalidPixelData` when the buffer length doesn't match its
/// dimensions.
pub fn encoded_header(image: &BmpImage) -> Result<BmpHeader, EncodeError> {
    let buf = &image.pixels;
    let (width, height) = buf.dimensions();

    if image.header.bits_per_pixel != SUPPORTED_BITS_PER_PIXEL {
        return Err(EncodeError::UnsupportedBitDepth(image.header.bits_per_pixel));
    }

    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = buf.pixel_count();
    if buf.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buf.pixels.len(),
        });
    }

    let padded = row_stride(width, SUPPORTED_BITS_PER_PIXEL) as u64 * height as u64;
    let total = HEADER_SIZE as u64 + image.gap.len() as u64 + padded;
    if width > i32::MAX as u32 || height > i32::MAX as u32 || total > u32::MAX as u64 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    Ok(image.header.with_dimensions(width, height, image.gap.len()))
}

/// Write `image` as an 8-bit BMP.
///
/// Writes, in order: the recomputed header, the gap blob verbatim, then each
/// row followed by its zero padding. Returns the number of bytes written,
/// which always equals the header's `file_size`.
pub fn write_bmp<W: Write + ?Sized>(writer: &mut W, image: &BmpImage) -> Result<u64, EncodeError> {
    let header = encoded_header(image)?;
    let padding = [0u8; 3];
    let padding = &padding[..row_padding(image.width(), header.bits_per_pixel)];

    header.write_to(writer)?;
    writer.write_all(&image.gap)?;

    let rows = image.pixels.rows();
    if header.is_bottom_up() {
        for row in rows.rev() {
            writer.write_all(row)?;
            writer.write_all(padding)?;
        }
    } else {
        for row in rows {
            writer.write_all(row)?;
            writer.write_all(padding)?;
        }
    }

    debug!(
        width = image.width(),
        height = image.height(),
        file_size = header.file_size,
        "encoded BMP"
    );
    Ok(header.file_size as u64)
}

/// Encode `image` into an in-memory BMP file.
pub fn encode_bmp(image: &BmpImage) -> Result<Vec<u8>, EncodeError> {
    let header = encoded_header(image)?;
    let mut bytes = Vec::with_capacity(header.file_size as usize);
    write_bmp(&mut bytes, image)?;
    Ok(bytes)
}

/// Save `image` to `path`.
///
/// The file is written to a temporary sibling, flushed to disk and then
/// renamed over `path`. If any step fails the temporary is removed and
/// `path` is left as it was.
pub fn save_bmp<P: AsRef<Path>>(path: P, image: &BmpImage) -> Result<u64, EncodeError> {
    let path = path.as_ref();
    // Validate before touching the filesystem.
    encoded_header(image)?;

    let tmp_path = temp_path_for(path);
    let result = write_to_file(&tmp_path, image).and_then(|written| {
        fs::rename(&tmp_path, path)?;
        Ok(written)
    });

    match result {
        Ok(written) => {
            debug!(path = %path.display(), bytes = written, "saved BMP");
            Ok(written)
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

fn write_to_file(path: &Path, image: &BmpImage) -> Result<u64, EncodeError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_bmp(&mut writer, image)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(written)
}

/// `dir/.name.tmp` next to the destination, so the rename stays on one
/// filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.bmp".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::decode::decode_bmp_bytes;
    use proptest::prelude::*;

    /// Strategy for a raster with random contents (keep small for speed).
    fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=37, 1u32..=37).prop_flat_map(|(w, h)| {
            let size = (w * h) as usize;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |pixels| PixelBuffer::new(w, h, pixels))
        })
    }

    proptest! {
        /// Property: Decoding an encoded image yields the same pixels.
        #[test]
        fn prop_roundtrip(buf in buffer_strategy(), top_down in any::<bool>()) {
            let mut image = BmpImage::new_grayscale(buf);
            if top_down {
                image.header.height = -image.header.height;
            }
            let decoded = decode_bmp_bytes(&encode_bmp(&image).unwrap()).unwrap();
            prop_assert_eq!(&decoded.pixels, &image.pixels);
            prop_assert_eq!(&decoded.gap, &image.gap);
        }

        /// Property: Declared file size always equals the byte count.
        #[test]
        fn prop_file_size_matches(buf in buffer_strategy()) {
            let image = BmpImage::new_grayscale(buf);
            let bytes = encode_bmp(&image).unwrap();
            let declared = u32::from_le_bytes(bytes[2..6].try_into().unwrap());
            prop_assert_eq!(declared as usize, bytes.len());
        }

        /// Property: Round-trip survives an arbitrary gap blob.
        #[test]
        fn prop_roundtrip_with_any_gap(
            buf in buffer_strategy(),
            gap in prop::collection::vec(any::<u8>(), 0..200),
        ) {
            let image = BmpImage {
                header: BmpHeader::grayscale(buf.width, buf.height, gap.len()),
                gap,
                pixels: buf,
            };
            let decoded = decode_bmp_bytes(&encode_bmp(&image).unwrap()).unwrap();
            prop_assert_eq!(decoded, image);
        }
    }
}
