//! Error types for BMP decoding.

use std::io;

use thiserror::Error;

use crate::header::{BMP_SIGNATURE, SUPPORTED_BITS_PER_PIXEL};

/// Error types for BMP decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The first two bytes are not the "BM" magic.
    #[error("Not a BMP file: signature 0x{0:04X}, expected 0x{sig:04X}", sig = BMP_SIGNATURE)]
    InvalidSignature(u16),

    /// Only 8-bit images are supported.
    #[error("Unsupported bit depth: {0} bits per pixel, expected {bpp}", bpp = SUPPORTED_BITS_PER_PIXEL)]
    UnsupportedBitDepth(u16),

    /// Only uncompressed (BI_RGB) pixel data is supported.
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(u32),

    /// A header field is inconsistent with a readable image.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The stream ended before the named section was complete.
    #[error("Unexpected end of file while reading {0}")]
    Truncated(&'static str),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Returns true for failures of the underlying stream rather than of
    /// the file's contents.
    pub fn is_io(&self) -> bool {
        matches!(self, DecodeError::Io(_) | DecodeError::Truncated(_))
    }

    /// Returns true when the file is a BMP this crate doesn't handle.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            DecodeError::UnsupportedBitDepth(_) | DecodeError::UnsupportedCompression(_)
        )
    }

    /// Map a read failure, turning a short read into [`DecodeError::Truncated`].
    pub(crate) fn from_read(err: io::Error, section: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated(section)
        } else {
            DecodeError::Io(err)
        }
    }
}
