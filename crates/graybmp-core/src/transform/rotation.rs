//! Lossless 90-degree rotation.
//!
//! Both directions are a pure index permutation of a `width` x `height`
//! raster into a `height` x `width` one. For every output coordinate
//! `(ox, oy)` in the new `nw` x `nh` frame (`nw = height`, `nh = width`):
//!
//! ```text
//! clockwise:         out[oy * nw + ox] = in[(nw - 1 - ox) * width + oy]
//! counter-clockwise: out[oy * nw + ox] = in[ox * width + (nh - 1 - oy)]
//! ```
//!
//! The two mappings are exact inverses of each other.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationDirection {
    /// 90 degrees clockwise ("rotate right").
    #[default]
    Clockwise,
    /// 90 degrees counter-clockwise ("rotate left").
    CounterClockwise,
}

impl RotationDirection {
    /// The rotation that undoes this one.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Rotate a raster by 90 degrees.
///
/// Returns a new buffer with `width` and `height` swapped.
///
/// # Example
///
/// ```
/// use graybmp_core::{rotate, PixelBuffer, RotationDirection};
///
/// let buf = PixelBuffer::new(2, 1, vec![1, 2]);
/// let rotated = rotate(&buf, RotationDirection::Clockwise);
/// assert_eq!(rotated.dimensions(), (1, 2));
/// assert_eq!(rotated.pixels, vec![1, 2]);
/// ```
pub fn rotate(buffer: &PixelBuffer, direction: RotationDirection) -> PixelBuffer {
    let (width, height) = (buffer.width as usize, buffer.height as usize);
    let (new_width, new_height) = (height, width);
    let src = &buffer.pixels;

    let mut output = Vec::with_capacity(new_width * new_height);
    for oy in 0..new_height {
        for ox in 0..new_width {
            let src_idx = match direction {
                RotationDirection::Clockwise => (new_width - 1 - ox) * width + oy,
                RotationDirection::CounterClockwise => ox * width + (new_height - 1 - oy),
            };
            output.push(src[src_idx]);
        }
    }

    PixelBuffer::new(new_width as u32, new_height as u32, output)
}

/// Rotate 90 degrees clockwise.
#[inline]
pub fn rotate_cw(buffer: &PixelBuffer) -> PixelBuffer {
    rotate(buffer, RotationDirection::Clockwise)
}

/// Rotate 90 degrees counter-clockwise.
#[inline]
pub fn rotate_ccw(buffer: &PixelBuffer) -> PixelBuffer {
    rotate(buffer, RotationDirection::CounterClockwise)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for a raster with random contents (keep small for speed).
    fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=40, 1u32..=40).prop_flat_map(|(w, h)| {
            let size = (w * h) as usize;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |pixels| PixelBuffer::new(w, h, pixels))
        })
    }

    proptest! {
        /// Property: Opposite rotations cancel out.
        #[test]
        fn prop_rotation_involution(buf in buffer_strategy()) {
            prop_assert_eq!(&rotate_ccw(&rotate_cw(&buf)), &buf);
            prop_assert_eq!(&rotate_cw(&rotate_ccw(&buf)), &buf);
        }

        /// Property: Four quarter turns in either direction are the identity.
        #[test]
        fn prop_four_turns_identity(buf in buffer_strategy()) {
            for direction in [RotationDirection::Clockwise, RotationDirection::CounterClockwise] {
                let mut out = buf.clone();
                for _ in 0..4 {
                    out = rotate(&out, direction);
                }
                prop_assert_eq!(&out, &buf);
            }
        }

        /// Property: Two turns either way give the same 180-degree result.
        #[test]
        fn prop_half_turn_agrees(buf in buffer_strategy()) {
            let cw2 = rotate_cw(&rotate_cw(&buf));
            let ccw2 = rotate_ccw(&rotate_ccw(&buf));
            prop_assert_eq!(cw2, ccw2);
        }

        /// Property: Rotation is a permutation (same multiset of values).
        #[test]
        fn prop_rotation_is_permutation(buf in buffer_strategy()) {
            let mut before = buf.pixels.clone();
            let mut after = rotate_cw(&buf).pixels;
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
        }

        /// Property: Dimensions swap.
        #[test]
        fn prop_dimensions_swap(buf in buffer_strategy()) {
            let rotated = rotate_ccw(&buf);
            prop_assert_eq!(rotated.dimensions(), (buf.height, buf.width));
            prop_assert_eq!(rotated.pixels.len(), buf.pixels.len());
        }
    }
}
