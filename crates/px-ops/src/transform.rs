//! Per-pixel transforms applied across whole buffers.
//!
//! A [`PixelMapper`] maps one packed pixel to a new one, independent of its
//! neighbours. [`apply`] runs it in place over a buffer; since every output
//! depends only on the same position's input, traversal order is irrelevant
//! and each pixel is read once and written once.
//!
//! [`PointOp`] is the closed set of transforms the pipeline uses. Any
//! `Fn(u32) -> u32` is a mapper too.
//!
//! ```rust
//! use px_core::PixelBuffer;
//! use px_ops::transform::{apply, PointOp};
//!
//! let mut img = PixelBuffer::filled(2, 2, 0xFFFF_FFFF).unwrap();
//! apply(&mut img, &PointOp::ExtractRed);
//! assert!(img.pixels().iter().all(|&p| p == 0xFF00_00FF));
//!
//! // Closures work as well
//! apply(&mut img, &|p: u32| p | 0x0000_FF00);
//! assert_eq!(img.pixel(0, 0), Some(0xFF00_FFFF));
//! ```

use crate::channel::{extract_blue, extract_green, extract_red};
use crate::grayscale::{LumaWeights, grayscale_average, grayscale_luminance};
use px_core::PixelBuffer;
use tracing::trace;

/// Maps a packed pixel to a new packed pixel.
pub trait PixelMapper {
    /// Returns the transformed pixel.
    fn map(&self, pixel: u32) -> u32;
}

impl<F> PixelMapper for F
where
    F: Fn(u32) -> u32,
{
    #[inline]
    fn map(&self, pixel: u32) -> u32 {
        self(pixel)
    }
}

/// Named point transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointOp {
    /// Keep red and alpha.
    ExtractRed,
    /// Keep green and alpha.
    ExtractGreen,
    /// Keep blue and alpha.
    ExtractBlue,
    /// Truncating channel average.
    GrayscaleAverage,
    /// Weighted luminance.
    GrayscaleLuminance(LumaWeights),
}

impl PointOp {
    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PointOp::ExtractRed => "Extract red",
            PointOp::ExtractGreen => "Extract green",
            PointOp::ExtractBlue => "Extract blue",
            PointOp::GrayscaleAverage => "Grayscale average",
            PointOp::GrayscaleLuminance(_) => "Grayscale luminance",
        }
    }
}

impl PixelMapper for PointOp {
    #[inline]
    fn map(&self, pixel: u32) -> u32 {
        match *self {
            PointOp::ExtractRed => extract_red(pixel),
            PointOp::ExtractGreen => extract_green(pixel),
            PointOp::ExtractBlue => extract_blue(pixel),
            PointOp::GrayscaleAverage => grayscale_average(pixel),
            PointOp::GrayscaleLuminance(w) => grayscale_luminance(pixel, w),
        }
    }
}

impl From<crate::channel::Channel> for PointOp {
    fn from(ch: crate::channel::Channel) -> Self {
        use crate::channel::Channel;
        match ch {
            Channel::Red => PointOp::ExtractRed,
            Channel::Green => PointOp::ExtractGreen,
            Channel::Blue => PointOp::ExtractBlue,
        }
    }
}

/// Replaces every pixel of `buffer` with `mapper.map(pixel)`, in place.
pub fn apply<M: PixelMapper + ?Sized>(buffer: &mut PixelBuffer, mapper: &M) {
    trace!(width = buffer.width(), height = buffer.height(), "apply");
    for p in buffer.pixels_mut() {
        *p = mapper.map(*p);
    }
}

/// Copies `source` and applies `mapper` to the copy.
pub fn map_copy<M: PixelMapper + ?Sized>(source: &PixelBuffer, mapper: &M) -> PixelBuffer {
    let mut out = source.clone();
    apply(&mut out, mapper);
    out
}
