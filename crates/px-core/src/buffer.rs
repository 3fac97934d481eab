//! Owned pixel buffers.
//!
//! [`PixelBuffer`] stores `width * height` packed RGBA pixels (see
//! [`crate::pixel`]) in **row-major** order, top-to-bottom:
//!
//! ```text
//! index = x + y * width
//! ```
//!
//! The length is fixed at construction. Every derivation (copy, transform,
//! convolution) produces a new buffer; two live buffers never share storage.
//!
//! # Usage
//!
//! ```rust
//! use px_core::PixelBuffer;
//!
//! let mut img = PixelBuffer::new(4, 3).unwrap();
//! img.set_pixel(1, 2, 0xFF00_00FF).unwrap();
//! assert_eq!(img.pixel(1, 2), Some(0xFF00_00FF));
//!
//! // Copying allocates a fresh buffer
//! let copy = img.clone();
//! assert_eq!(copy, img);
//! ```

use crate::{Error, Result, pixel};
use tracing::trace;

/// Owned width x height grid of packed RGBA pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

/// Validates dimensions and returns the pixel count.
fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))
}

/// Allocates `count` pixels set to `value`, reporting allocator refusal.
fn allocate(count: usize, value: u32) -> Result<Vec<u32>> {
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count).map_err(|e| {
        Error::allocation_failed(count.saturating_mul(std::mem::size_of::<u32>()), e.to_string())
    })?;
    pixels.resize(count, value);
    Ok(pixels)
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if either dimension is zero or the
    ///   pixel count overflows.
    /// - [`Error::AllocationFailed`] if the allocator refuses the request.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, 0)
    }

    /// Creates a buffer with every pixel set to `value`.
    ///
    /// ```rust
    /// use px_core::PixelBuffer;
    ///
    /// let white = PixelBuffer::filled(3, 3, 0xFFFF_FFFF).unwrap();
    /// assert!(white.pixels().iter().all(|&p| p == 0xFFFF_FFFF));
    /// ```
    pub fn filled(width: u32, height: u32, value: u32) -> Result<Self> {
        let count = pixel_count(width, height)?;
        trace!(width, height, "PixelBuffer::filled");
        Ok(Self {
            width,
            height,
            pixels: allocate(count, value)?,
        })
    }

    /// Wraps existing packed pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLength`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::DataLength {
                width,
                height,
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Builds a buffer from interleaved 8-bit `[R, G, B, A]` bytes.
    ///
    /// This is the hand-off point from a decoder. Absent pixel data is
    /// rejected here so nothing downstream ever sees a buffer without
    /// backing storage.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingPixelData`] if `bytes` is empty.
    /// - [`Error::DataLength`] if `bytes.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::MissingPixelData(format!(
                "decoder returned no data for {width}x{height} image"
            )));
        }
        let expected = pixel_count(width, height)?;
        if bytes.len() != expected.saturating_mul(4) {
            return Err(Error::DataLength {
                width,
                height,
                expected: expected.saturating_mul(4),
                got: bytes.len(),
            });
        }
        let mut pixels = allocate(expected, 0)?;
        for (dst, src) in pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            *dst = u32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        }
        Ok(Self { width, height, pixels })
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always `false`: a buffer cannot be constructed without pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if (x, y) lies outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let idx = self.index(x, y);
        self.pixels[idx] = value;
        Ok(())
    }

    /// Returns the pixel nearest to (x, y) inside the image.
    ///
    /// Coordinates are clamped to `[0, width - 1] x [0, height - 1]`
    /// (clamp-to-edge), so any signed offset is a valid query.
    ///
    /// ```rust
    /// use px_core::PixelBuffer;
    ///
    /// let img = PixelBuffer::from_pixels(2, 1, vec![1, 2]).unwrap();
    /// assert_eq!(img.sample_clamped(-5, 0), 1);
    /// assert_eq!(img.sample_clamped(2, 0), 2);
    /// assert_eq!(img.sample_clamped(1, 9), 2);
    /// ```
    #[inline]
    pub fn sample_clamped(&self, x: i64, y: i64) -> u32 {
        let sx = clamp_coord(x, self.width);
        let sy = clamp_coord(y, self.height);
        self.pixels[sx + sy * self.width as usize]
    }

    /// Returns a row of pixels as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Returns all pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Returns all pixels mutably. The length cannot change.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Consumes the buffer and returns its pixels.
    #[inline]
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Returns interleaved 8-bit `[R, G, B, A]` bytes, e.g. for an encoder
    /// or a texture upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| pixel::unpack(p)).collect()
    }

    /// Returns `true` if every pixel has alpha 0xFF.
    pub fn is_opaque(&self) -> bool {
        self.pixels.iter().all(|&p| pixel::alpha(p) == 0xFF)
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}

/// Clamps a signed coordinate into `[0, len - 1]`.
///
/// `len` must be non-zero, which every [`PixelBuffer`] guarantees.
#[inline]
pub fn clamp_coord(v: i64, len: u32) -> usize {
    v.clamp(0, i64::from(len) - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zero_filled() {
        let img = PixelBuffer::new(4, 3).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.len(), 12);
        assert!(img.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 10),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PixelBuffer::new(10, 0),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_huge_allocation_fails_cleanly() {
        // 16 GiB of pixels: either overflow on 32-bit or allocator refusal
        let result = PixelBuffer::new(u32::MAX, u32::MAX);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_pixels_length_check() {
        let err = PixelBuffer::from_pixels(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, Error::DataLength { expected: 4, got: 3, .. }));
    }

    #[test]
    fn test_from_rgba8() {
        let bytes = [0xFF, 0x00, 0x00, 0xFF, 0x00, 0x80, 0x00, 0x7F];
        let img = PixelBuffer::from_rgba8(2, 1, &bytes).unwrap();
        assert_eq!(img.pixels(), &[0xFF00_00FF, 0x7F00_8000]);
        assert_eq!(img.to_rgba8(), bytes.to_vec());
        assert!(!img.is_opaque());
    }

    #[test]
    fn test_from_rgba8_missing_data() {
        let err = PixelBuffer::from_rgba8(64, 64, &[]).unwrap_err();
        assert!(err.is_decode_error());
        assert!(matches!(err, Error::MissingPixelData(_)));
    }

    #[test]
    fn test_from_rgba8_short_data() {
        let err = PixelBuffer::from_rgba8(2, 2, &[0u8; 15]).unwrap_err();
        assert!(matches!(err, Error::DataLength { expected: 16, got: 15, .. }));
    }

    #[test]
    fn test_set_pixel_bounds() {
        let mut img = PixelBuffer::new(2, 2).unwrap();
        assert!(img.set_pixel(1, 1, 7).is_ok());
        assert_eq!(img.pixel(1, 1), Some(7));
        assert!(img.set_pixel(2, 0, 7).is_err());
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = PixelBuffer::filled(2, 2, 0xFFFF_FFFF).unwrap();
        let mut copy = original.clone();
        copy.pixels_mut()[0] = 0;
        assert_eq!(original.pixel(0, 0), Some(0xFFFF_FFFF));
        assert_eq!(copy.pixel(0, 0), Some(0));
    }

    #[test]
    fn test_row_layout() {
        let img = PixelBuffer::from_pixels(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(img.row(0), &[0, 1, 2]);
        assert_eq!(img.row(1), &[3, 4, 5]);
        assert_eq!(img.pixel(2, 1), Some(5));
    }

    #[test]
    fn test_sample_clamped_exact_boundary() {
        // Right edge must replicate the last column, never wrap into the
        // next row's first pixel
        let img = PixelBuffer::from_pixels(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(img.sample_clamped(3, 0), 2);
        assert_eq!(img.sample_clamped(3, 1), 5);
        assert_eq!(img.sample_clamped(0, 2), 3);
        assert_eq!(img.sample_clamped(3, 2), 5);
        assert_eq!(img.sample_clamped(-1, -1), 0);
    }

    #[test]
    fn test_clamp_coord() {
        assert_eq!(clamp_coord(-3, 5), 0);
        assert_eq!(clamp_coord(4, 5), 4);
        assert_eq!(clamp_coord(5, 5), 4);
        assert_eq!(clamp_coord(99, 5), 4);
        assert_eq!(clamp_coord(0, 1), 0);
    }
}
