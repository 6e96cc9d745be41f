//! The fixed 54-byte BMP header record.
//!
//! The record is the 14-byte file header followed by the 40-byte
//! `BITMAPINFOHEADER`. Fields are read and written one at a time in
//! little-endian order at their documented offsets:
//!
//! ```text
//! offset  field               type
//!      0  signature           u16  ("BM" = 0x4D42)
//!      2  file_size           u32
//!      6  reserved1           u16
//!      8  reserved2           u16
//!     10  data_offset         u32
//!     14  info_header_size    u32
//!     18  width               i32
//!     22  height              i32  (positive = bottom-up rows)
//!     26  planes              u16
//!     28  bits_per_pixel      u16
//!     30  compression         u32
//!     34  image_size          u32
//!     38  x_pixels_per_meter  i32
//!     42  y_pixels_per_meter  i32
//!     46  colors_used         u32
//!     50  colors_important    u32
//! ```
//!
//! Anything a file stores between this record and `data_offset` (a larger
//! info header, the colour table) is treated as opaque gap data and never
//! parsed here.

use std::io::{self, Read, Write};

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

/// The two-byte magic "BM" read as a little-endian u16.
pub const BMP_SIGNATURE: u16 = 0x4D42;

/// Size of the fixed header record in bytes.
pub const HEADER_SIZE: usize = 54;

/// Size of the `BITMAPINFOHEADER` portion of the record.
pub const INFO_HEADER_SIZE: u32 = 40;

/// The only bit depth this crate decodes and encodes.
pub const SUPPORTED_BITS_PER_PIXEL: u16 = 8;

/// `BI_RGB`: uncompressed pixel rows.
pub const COMPRESSION_NONE: u32 = 0;

/// 72 DPI expressed in pixels per meter.
const DEFAULT_PIXELS_PER_METER: i32 = 2835;

/// Number of entries in an 8-bit colour table.
const PALETTE_ENTRIES: u32 = 256;

/// Bytes occupied by one on-disk pixel row, rounded up to a 4-byte boundary.
#[inline]
pub fn row_stride(width: u32, bits_per_pixel: u16) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(32) * 4
}

/// Filler bytes appended to each on-disk row to reach [`row_stride`].
#[inline]
pub fn row_padding(width: u32, bits_per_pixel: u16) -> usize {
    row_stride(width, bits_per_pixel) - (width as usize * bits_per_pixel as usize) / 8
}

/// A 256-entry gray colour table (`B, G, R, 0` per entry), 1024 bytes.
pub fn grayscale_palette() -> Vec<u8> {
    (0..PALETTE_ENTRIES)
        .flat_map(|i| {
            let v = i as u8;
            [v, v, v, 0]
        })
        .collect()
}

/// The fixed-layout BMP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmpHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub data_offset: u32,
    pub info_header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BmpHeader {
    /// Build a header for a fresh bottom-up 8-bit image whose gap holds
    /// `gap_len` bytes (normally the 1024-byte [`grayscale_palette`]).
    pub fn grayscale(width: u32, height: u32, gap_len: usize) -> Self {
        let stride = row_stride(width, SUPPORTED_BITS_PER_PIXEL);
        let data_offset = (HEADER_SIZE + gap_len) as u32;
        let image_size = (stride * height as usize) as u32;
        Self {
            signature: BMP_SIGNATURE,
            file_size: data_offset + image_size,
            reserved1: 0,
            reserved2: 0,
            data_offset,
            info_header_size: INFO_HEADER_SIZE,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits_per_pixel: SUPPORTED_BITS_PER_PIXEL,
            compression: COMPRESSION_NONE,
            image_size,
            x_pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            y_pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            colors_used: PALETTE_ENTRIES,
            colors_important: 0,
        }
    }

    /// Read the 54-byte record from the current position of `reader`.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Parse the record from its on-disk bytes.
    pub fn from_bytes(b: &[u8; HEADER_SIZE]) -> Self {
        Self {
            signature: LittleEndian::read_u16(&b[0..2]),
            file_size: LittleEndian::read_u32(&b[2..6]),
            reserved1: LittleEndian::read_u16(&b[6..8]),
            reserved2: LittleEndian::read_u16(&b[8..10]),
            data_offset: LittleEndian::read_u32(&b[10..14]),
            info_header_size: LittleEndian::read_u32(&b[14..18]),
            width: LittleEndian::read_i32(&b[18..22]),
            height: LittleEndian::read_i32(&b[22..26]),
            planes: LittleEndian::read_u16(&b[26..28]),
            bits_per_pixel: LittleEndian::read_u16(&b[28..30]),
            compression: LittleEndian::read_u32(&b[30..34]),
            image_size: LittleEndian::read_u32(&b[34..38]),
            x_pixels_per_meter: LittleEndian::read_i32(&b[38..42]),
            y_pixels_per_meter: LittleEndian::read_i32(&b[42..46]),
            colors_used: LittleEndian::read_u32(&b[46..50]),
            colors_important: LittleEndian::read_u32(&b[50..54]),
        }
    }

    /// Write the 54-byte record to `writer`.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Serialize the record into a fixed-size array.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut b = [0u8; HEADER_SIZE];
        LittleEndian::write_u16(&mut b[0..2], self.signature);
        LittleEndian::write_u32(&mut b[2..6], self.file_size);
        LittleEndian::write_u16(&mut b[6..8], self.reserved1);
        LittleEndian::write_u16(&mut b[8..10], self.reserved2);
        LittleEndian::write_u32(&mut b[10..14], self.data_offset);
        LittleEndian::write_u32(&mut b[14..18], self.info_header_size);
        LittleEndian::write_i32(&mut b[18..22], self.width);
        LittleEndian::write_i32(&mut b[22..26], self.height);
        LittleEndian::write_u16(&mut b[26..28], self.planes);
        LittleEndian::write_u16(&mut b[28..30], self.bits_per_pixel);
        LittleEndian::write_u32(&mut b[30..34], self.compression);
        LittleEndian::write_u32(&mut b[34..38], self.image_size);
        LittleEndian::write_i32(&mut b[38..42], self.x_pixels_per_meter);
        LittleEndian::write_i32(&mut b[42..46], self.y_pixels_per_meter);
        LittleEndian::write_u32(&mut b[46..50], self.colors_used);
        LittleEndian::write_u32(&mut b[50..54], self.colors_important);
        b
    }

    /// Positive height means rows are stored bottom-up on disk.
    #[inline]
    pub fn is_bottom_up(&self) -> bool {
        self.height > 0
    }

    /// Pixel width, or `None` when the stored width is not positive.
    pub fn pixel_width(&self) -> Option<u32> {
        u32::try_from(self.width).ok().filter(|&w| w > 0)
    }

    /// Pixel height regardless of row order, or `None` when zero.
    pub fn pixel_height(&self) -> Option<u32> {
        Some(self.height.unsigned_abs()).filter(|&h| h > 0)
    }

    /// Length of the opaque region between this record and the pixel data.
    pub fn gap_len(&self) -> Option<usize> {
        (self.data_offset as usize).checked_sub(HEADER_SIZE)
    }

    /// Return a copy describing a `width` x `height` image stored after a
    /// gap of `gap_len` bytes.
    ///
    /// The height sign (row order) is kept, `file_size` and `data_offset` are
    /// recomputed for the padded on-disk layout, and `image_size` is
    /// recomputed only when the source declared one (zero is legal for
    /// uncompressed data and stays zero). Every other field is carried
    /// through verbatim.
    pub fn with_dimensions(&self, width: u32, height: u32, gap_len: usize) -> Self {
        let stride = row_stride(width, self.bits_per_pixel);
        let pixel_bytes = (stride * height as usize) as u32;
        let data_offset = (HEADER_SIZE + gap_len) as u32;

        let signed_height = if self.height < 0 {
            -(height as i32)
        } else {
            height as i32
        };

        Self {
            width: width as i32,
            height: signed_height,
            data_offset,
            file_size: data_offset + pixel_bytes,
            image_size: if self.image_size == 0 { 0 } else { pixel_bytes },
            ..*self
        }
    }
}
