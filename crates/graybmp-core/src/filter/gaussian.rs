//! 3x3 Gaussian smoothing.
//!
//! The kernel is
//!
//! ```text
//! | 1 2 1 |
//! | 2 4 2 | / 16
//! | 1 2 1 |
//! ```
//!
//! The weighted sum is accumulated in integers and divided by 16 with
//! truncation. Every weight is an exact binary fraction, so this is
//! bit-identical to summing `value * weight / 16` in floating point and
//! truncating toward zero.

use crate::buffer::PixelBuffer;

/// Unnormalized kernel weights, indexed `[dy + 1][dx + 1]`.
pub const GAUSSIAN_KERNEL: [[u32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

/// Sum of [`GAUSSIAN_KERNEL`].
pub const KERNEL_WEIGHT: u32 = 16;

/// Apply the 3x3 Gaussian kernel to every interior pixel.
///
/// Border pixels are passed through unchanged. Rasters narrower or shorter
/// than 3 pixels have no interior and come back as an exact copy.
pub fn apply_gaussian(buffer: &PixelBuffer) -> PixelBuffer {
    let (width, height) = (buffer.width as usize, buffer.height as usize);
    let src = &buffer.pixels;
    let mut output = src.clone();

    if width < 3 || height < 3 {
        return PixelBuffer::new(buffer.width, buffer.height, output);
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = 0u32;
            for (ky, kernel_row) in GAUSSIAN_KERNEL.iter().enumerate() {
                let row_start = (y + ky - 1) * width;
                for (kx, &weight) in kernel_row.iter().enumerate() {
                    sum += src[row_start + x + kx - 1] as u32 * weight;
                }
            }
            // Max sum is 255 * 16, so the quotient always fits in a u8.
            output[y * width + x] = (sum / KERNEL_WEIGHT) as u8;
        }
    }

    PixelBuffer::new(buffer.width, buffer.height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_weight_matches_kernel() {
        let total: u32 = GAUSSIAN_KERNEL.iter().flatten().sum();
        assert_eq!(total, KERNEL_WEIGHT);
    }

    #[test]
    fn test_flat_image_unchanged() {
        for v in [0u8, 1, 127, 200, 255] {
            let buf = PixelBuffer::filled(6, 5, v);
            assert_eq!(apply_gaussian(&buf), buf, "flat value {}", v);
        }
    }

    #[test]
    fn test_single_bright_pixel() {
        let mut buf = PixelBuffer::filled(5, 5, 0);
        buf.pixels[2 * 5 + 2] = 160;
        let out = apply_gaussian(&buf);

        // Center: 160 * 4 / 16
        assert_eq!(out.get(2, 2), Some(40));
        // Edge neighbours: 160 * 2 / 16
        assert_eq!(out.get(1, 2), Some(20));
        assert_eq!(out.get(2, 1), Some(20));
        // Corner neighbours: 160 / 16
        assert_eq!(out.get(1, 1), Some(10));
        assert_eq!(out.get(3, 3), Some(10));
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        // Center 4*v, others 0: 15 * 4 / 16 = 3.75 -> 3
        let mut buf = PixelBuffer::filled(3, 3, 0);
        buf.pixels[4] = 15;
        let out = apply_gaussian(&buf);
        assert_eq!(out.get(1, 1), Some(3));
    }

    #[test]
    fn test_matches_floating_point_reference() {
        let pixels: Vec<u8> = (0..64u32).map(|i| ((i * 37 + 11) % 256) as u8).collect();
        let buf = PixelBuffer::new(8, 8, pixels);
        let out = apply_gaussian(&buf);

        let kernel = [
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
            [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        ];
        for y in 1..7usize {
            for x in 1..7usize {
                let mut sum = 0.0f64;
                for j in 0..3 {
                    for i in 0..3 {
                        sum += buf.pixels[(y + j - 1) * 8 + (x + i - 1)] as f64 * kernel[j][i];
                    }
                }
                assert_eq!(out.pixels[y * 8 + x], sum as u8, "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_border_pass_through() {
        let pixels: Vec<u8> = (0..30u32).map(|i| (i * 8) as u8).collect();
        let buf = PixelBuffer::new(6, 5, pixels);
        let out = apply_gaussian(&buf);

        for x in 0..6 {
            assert_eq!(out.get(x, 0), buf.get(x, 0));
            assert_eq!(out.get(x, 4), buf.get(x, 4));
        }
        for y in 0..5 {
            assert_eq!(out.get(0, y), buf.get(0, y));
            assert_eq!(out.get(5, y), buf.get(5, y));
        }
    }

    #[test]
    fn test_small_images_are_copied() {
        for (w, h) in [(1, 1), (2, 2), (2, 5), (5, 2), (1, 7)] {
            let pixels: Vec<u8> = (0..w * h).map(|i| (i * 13) as u8).collect();
            let buf = PixelBuffer::new(w, h, pixels);
            assert_eq!(apply_gaussian(&buf), buf, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_empty_image() {
        let buf = PixelBuffer::new(0, 0, vec![]);
        assert!(apply_gaussian(&buf).is_empty());
    }

    #[test]
    fn test_input_untouched() {
        let mut buf = PixelBuffer::filled(4, 4, 0);
        buf.pixels[5] = 255;
        let copy = buf.clone();
        let _ = apply_gaussian(&buf);
        assert_eq!(buf, copy);
    }

    #[test]
    fn test_reads_input_not_partial_output() {
        // A filter that wrote in place would feed (1,1)'s new value into (2,1).
        let buf = PixelBuffer::new(4, 3, vec![0, 0, 0, 0, 0, 160, 0, 0, 0, 0, 0, 0]);
        let out = apply_gaussian(&buf);
        assert_eq!(out.get(1, 1), Some(40));
        assert_eq!(out.get(2, 1), Some(20));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=32, 1u32..=32).prop_flat_map(|(w, h)| {
            let size = (w * h) as usize;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |pixels| PixelBuffer::new(w, h, pixels))
        })
    }

    proptest! {
        /// Property: A uniform raster is a fixed point of the filter.
        #[test]
        fn prop_flat_input_unchanged(
            (w, h) in (3u32..=32, 3u32..=32),
            v in any::<u8>(),
        ) {
            let buf = PixelBuffer::filled(w, h, v);
            prop_assert_eq!(apply_gaussian(&buf), buf);
        }

        /// Property: Every edge pixel is bit-identical after filtering.
        #[test]
        fn prop_border_pass_through(buf in buffer_strategy()) {
            let out = apply_gaussian(&buf);
            let (w, h) = buf.dimensions();
            for x in 0..w {
                prop_assert_eq!(out.get(x, 0), buf.get(x, 0));
                prop_assert_eq!(out.get(x, h - 1), buf.get(x, h - 1));
            }
            for y in 0..h {
                prop_assert_eq!(out.get(0, y), buf.get(0, y));
                prop_assert_eq!(out.get(w - 1, y), buf.get(w - 1, y));
            }
        }

        /// Property: Output stays within the neighbourhood's value range.
        #[test]
        fn prop_output_bounded_by_input(buf in buffer_strategy()) {
            let out = apply_gaussian(&buf);
            let min = buf.pixels.iter().copied().min().unwrap_or(0);
            let max = buf.pixels.iter().copied().max().unwrap_or(0);
            for &p in &out.pixels {
                prop_assert!(p >= min && p <= max);
            }
        }

        /// Property: Dimensions are preserved.
        #[test]
        fn prop_dimensions_preserved(buf in buffer_strategy()) {
            let out = apply_gaussian(&buf);
            prop_assert_eq!(out.dimensions(), buf.dimensions());
            prop_assert_eq!(out.pixels.len(), buf.pixels.len());
        }
    }
}
