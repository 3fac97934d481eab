//! Convolution kernels and 2-D convolution over packed RGBA buffers.
//!
//! # Kernels
//!
//! - [`Kernel::gaussian_3x3`], [`Kernel::gaussian_5x5`] - Binomial blurs
//! - [`Kernel::gaussian_3x3_legacy`] - 3x3 blur with a 3/16 centre, sums to 15/16
//! - [`Kernel::sobel_horizontal`], [`Kernel::sobel_vertical`] - Edge detection
//! - [`Kernel::box_blur`] - Simple average blur
//! - [`Kernel::gaussian`] - Gaussian blur of arbitrary size and sigma
//! - [`Kernel::sharpen`], [`Kernel::laplacian`], [`Kernel::emboss`]
//!
//! # Sampling
//!
//! Neighbours outside the image are clamped to the nearest edge pixel, so
//! sampling never leaves `[0, width - 1] x [0, height - 1]`. Red, green and
//! blue are accumulated in `f32`, rounded and saturated to `[0, 255]`; the
//! output is always opaque.
//!
//! # Example
//!
//! ```rust
//! use px_core::PixelBuffer;
//! use px_ops::filter::{convolve, Kernel};
//!
//! let src = PixelBuffer::filled(16, 16, 0xFF80_8080).unwrap();
//! let blurred = convolve(&src, &Kernel::gaussian_5x5()).unwrap();
//! assert_eq!(blurred, src);
//! ```

use crate::{OpsError, OpsResult};
use px_core::{PixelBuffer, pixel};
use tracing::trace;

/// Default scale factor applied to the Sobel kernels.
pub const SOBEL_FACTOR: f32 = 2.0;

/// Convolution kernel for image filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

fn check_odd(width: usize, height: usize) -> OpsResult<()> {
    if width % 2 == 0 || height % 2 == 0 {
        return Err(OpsError::InvalidKernel(format!(
            "kernel dimensions must be odd, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Number of weights in a `width x height` kernel.
fn kernel_len(width: usize, height: usize) -> OpsResult<usize> {
    width.checked_mul(height).ok_or_else(|| {
        OpsError::InvalidKernel(format!("kernel size {width}x{height} overflows"))
    })
}

/// Allocates `count` copies of `value`, reporting allocator refusal.
fn try_alloc<T: Clone>(count: usize, value: T) -> OpsResult<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(count).map_err(|e| {
        px_core::Error::allocation_failed(count.saturating_mul(std::mem::size_of::<T>()), e.to_string())
    })?;
    data.resize(count, value);
    Ok(data)
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// Width and height must be odd numbers.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> OpsResult<Self> {
        check_odd(width, height)?;
        if data.len() != kernel_len(width, height)? {
            return Err(OpsError::InvalidKernel(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Creates an all-zero kernel to be populated with [`set`](Self::set).
    ///
    /// ```rust
    /// use px_ops::filter::Kernel;
    ///
    /// let mut k = Kernel::zeros(3, 1).unwrap();
    /// k.set(0, 0, -1.0);
    /// k.set(2, 0, 1.0);
    /// assert_eq!(k.weights(), &[-1.0, 0.0, 1.0]);
    ///
    /// assert!(Kernel::zeros(2, 3).is_err());
    /// ```
    pub fn zeros(width: usize, height: usize) -> OpsResult<Self> {
        check_odd(width, height)?;
        let data = try_alloc(kernel_len(width, height)?, 0.0)?;
        Ok(Self { data, width, height })
    }

    /// Builds a kernel from integer weights divided by `divisor`.
    fn from_ints(ints: &[i32], width: usize, height: usize, divisor: f32) -> Self {
        Self {
            data: ints.iter().map(|&v| v as f32 / divisor).collect(),
            width,
            height,
        }
    }

    /// Outer product of a vertical and a horizontal 1-D kernel.
    ///
    /// Both lengths must be odd.
    pub fn outer(vertical: &[f32], horizontal: &[f32]) -> OpsResult<Self> {
        check_odd(horizontal.len(), vertical.len())?;
        let width = horizontal.len();
        let mut data = try_alloc(kernel_len(width, vertical.len())?, 0.0f32)?;
        for (i, w) in data.iter_mut().enumerate() {
            *w = vertical[i / width] * horizontal[i % width];
        }
        Ok(Self {
            data,
            width: horizontal.len(),
            height: vertical.len(),
        })
    }

    /// The 1x1 kernel with weight 1.0.
    pub fn identity() -> Self {
        Self {
            data: vec![1.0],
            width: 1,
            height: 1,
        }
    }

    /// 3x3 binomial blur, `[1 2 1]` outer product over 16.
    pub fn gaussian_3x3() -> Self {
        Self::from_ints(&[1, 2, 1, 2, 4, 2, 1, 2, 1], 3, 3, 16.0)
    }

    /// 3x3 blur with weights `1-2-1 / 2-3-2 / 1-2-1` over 16.
    ///
    /// The weights sum to 15/16, so every pass darkens the image slightly
    /// (white becomes 239). Kept for reproducing output made with this
    /// variant; use [`gaussian_3x3`](Self::gaussian_3x3) otherwise.
    pub fn gaussian_3x3_legacy() -> Self {
        Self::from_ints(&[1, 2, 1, 2, 3, 2, 1, 2, 1], 3, 3, 16.0)
    }

    /// 5x5 binomial blur, `[1 4 6 4 1]` outer product over 256.
    pub fn gaussian_5x5() -> Self {
        #[rustfmt::skip]
        let ints = [
            1,  4,  6,  4, 1,
            4, 16, 24, 16, 4,
            6, 24, 36, 24, 6,
            4, 16, 24, 16, 4,
            1,  4,  6,  4, 1,
        ];
        Self::from_ints(&ints, 5, 5, 256.0)
    }

    /// Horizontal-gradient Sobel kernel (responds to vertical edges),
    /// `[1 2 1]^T x [1 0 -1] / 4`, scaled by [`SOBEL_FACTOR`].
    pub fn sobel_horizontal() -> Self {
        Self::sobel_horizontal_scaled(SOBEL_FACTOR)
    }

    /// [`sobel_horizontal`](Self::sobel_horizontal) with a custom factor.
    pub fn sobel_horizontal_scaled(factor: f32) -> Self {
        Self::from_ints(&[1, 0, -1, 2, 0, -2, 1, 0, -1], 3, 3, 4.0).scaled(factor)
    }

    /// Vertical-gradient Sobel kernel (responds to horizontal edges),
    /// `[1 0 -1]^T x [1 2 1] / 4`, scaled by [`SOBEL_FACTOR`].
    pub fn sobel_vertical() -> Self {
        Self::sobel_vertical_scaled(SOBEL_FACTOR)
    }

    /// [`sobel_vertical`](Self::sobel_vertical) with a custom factor.
    pub fn sobel_vertical_scaled(factor: f32) -> Self {
        Self::from_ints(&[1, 2, 1, 0, 0, 0, -1, -2, -1], 3, 3, 4.0).scaled(factor)
    }

    /// Creates a box blur kernel (simple average).
    ///
    /// Even sizes are rounded up to the next odd size.
    pub fn box_blur(size: usize) -> OpsResult<Self> {
        let size = size | 1;
        let count = kernel_len(size, size)?;
        let data = try_alloc(count, 1.0 / count as f32)?;
        Ok(Self { data, width: size, height: size })
    }

    /// Creates a normalized Gaussian blur kernel.
    ///
    /// # Arguments
    ///
    /// * `size` - Kernel size (will be made odd)
    /// * `sigma` - Standard deviation (blur amount), must be > 0
    pub fn gaussian(size: usize, sigma: f32) -> OpsResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        let size = size | 1;
        let mut data = try_alloc(kernel_len(size, size)?, 0.0f32)?;
        let half = (size / 2) as f32;
        let sigma2 = 2.0 * sigma * sigma;
        let mut sum = 0.0f32;

        for (i, w) in data.iter_mut().enumerate() {
            let x = (i % size) as f32 - half;
            let y = (i / size) as f32 - half;
            *w = (-(x * x + y * y) / sigma2).exp();
            sum += *w;
        }

        for w in &mut data {
            *w /= sum;
        }

        Ok(Self { data, width: size, height: size })
    }

    /// Creates a sharpening kernel. `amount` of 0.5-2.0 is typical.
    pub fn sharpen(amount: f32) -> Self {
        let center = 1.0 + 4.0 * amount;
        #[rustfmt::skip]
        let data = vec![
            0.0, -amount, 0.0,
            -amount, center, -amount,
            0.0, -amount, 0.0,
        ];
        Self { data, width: 3, height: 3 }
    }

    /// 4-neighbour Laplacian edge kernel.
    pub fn laplacian() -> Self {
        Self::from_ints(&[0, -1, 0, -1, 4, -1, 0, -1, 0], 3, 3, 1.0)
    }

    /// Creates an emboss kernel.
    pub fn emboss() -> Self {
        Self::from_ints(&[-2, -1, 0, -1, 1, 1, 0, 1, 2], 3, 3, 1.0)
    }

    /// Returns a copy with every weight multiplied by `factor`.
    pub fn scaled(mut self, factor: f32) -> Self {
        for w in &mut self.data {
            *w *= factor;
        }
        self
    }

    /// Kernel width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Kernel height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major weights, for populating a [`zeros`](Self::zeros)
    /// kernel in bulk.
    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Weight at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the kernel.
    #[inline]
    pub fn weight(&self, x: usize, y: usize) -> f32 {
        assert!(x < self.width && y < self.height, "kernel index out of range");
        self.data[x + y * self.width]
    }

    /// Sets the weight at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the kernel.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, w: f32) {
        assert!(x < self.width && y < self.height, "kernel index out of range");
        self.data[x + y * self.width] = w;
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

impl std::str::FromStr for Kernel {
    type Err = OpsError;

    /// Parses rows separated by `;` with comma-separated weights,
    /// e.g. `"1,2,1;2,4,2;1,2,1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut data = Vec::new();
        let mut width = None;
        let mut height = 0;
        for row in s.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            let values = row
                .split(',')
                .map(|v| {
                    v.trim().parse::<f32>().map_err(|e| {
                        OpsError::InvalidKernel(format!("bad weight '{}': {e}", v.trim()))
                    })
                })
                .collect::<OpsResult<Vec<_>>>()?;
            match width {
                None => width = Some(values.len()),
                Some(w) if w != values.len() => {
                    return Err(OpsError::InvalidKernel(format!(
                        "row {height} has {} weights, expected {w}",
                        values.len()
                    )));
                }
                Some(_) => {}
            }
            data.extend(values);
            height += 1;
        }
        let width = width.ok_or_else(|| OpsError::InvalidKernel("empty kernel".into()))?;
        Self::new(data, width, height)
    }
}

/// Accumulated red, green, blue sums for one output pixel.
#[derive(Default, Clone, Copy)]
struct Rgb {
    r: f32,
    g: f32,
    b: f32,
}

impl Rgb {
    #[inline]
    fn add_weighted(&mut self, p: u32, w: f32) {
        self.r += pixel::red(p) as f32 * w;
        self.g += pixel::green(p) as f32 * w;
        self.b += pixel::blue(p) as f32 * w;
    }

    #[inline]
    fn pack(self) -> u32 {
        pixel::pack_opaque(
            pixel::quantize(self.r),
            pixel::quantize(self.g),
            pixel::quantize(self.b),
        )
    }
}

/// Computes the output pixel at (x, y) of a direct 2-D convolution.
#[inline]
pub(crate) fn convolve_at(src: &PixelBuffer, kernel: &Kernel, x: u32, y: u32) -> u32 {
    let (rx, ry) = kernel.radius();
    let (rx, ry) = (rx as i64, ry as i64);
    let mut acc = Rgb::default();
    for dy in -ry..=ry {
        let row = (dy + ry) as usize * kernel.width;
        for dx in -rx..=rx {
            let w = kernel.data[row + (dx + rx) as usize];
            let p = src.sample_clamped(x as i64 + dx, y as i64 + dy);
            acc.add_weighted(p, w);
        }
    }
    acc.pack()
}

/// Applies `kernel` to `src`, producing a new opaque buffer of the same size.
///
/// # Example
///
/// ```rust
/// use px_core::PixelBuffer;
/// use px_ops::filter::{convolve, Kernel};
///
/// let src = PixelBuffer::filled(8, 8, 0xFF10_2030).unwrap();
/// let out = convolve(&src, &Kernel::identity()).unwrap();
/// assert_eq!(out, src);
/// ```
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel_w = kernel.width,
        kernel_h = kernel.height,
        "convolve"
    );

    let mut dst = PixelBuffer::new(src.width(), src.height())?;
    let width = src.width() as usize;
    for (i, out) in dst.pixels_mut().iter_mut().enumerate() {
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        *out = convolve_at(src, kernel, x, y);
    }

    Ok(dst)
}

/// Separable convolution: a horizontal pass then a vertical pass.
///
/// Equivalent to [`convolve`] with `Kernel::outer(vertical, horizontal)`
/// up to one code value of rounding difference. Intermediate sums stay in
/// `f32` and are only rounded once at the end.
///
/// # Example
///
/// ```rust
/// use px_core::PixelBuffer;
/// use px_ops::filter::convolve_separable;
///
/// let taps = [0.25, 0.5, 0.25];
/// let src = PixelBuffer::filled(8, 8, 0xFFFF_FFFF).unwrap();
/// let out = convolve_separable(&src, &taps, &taps).unwrap();
/// assert_eq!(out, src);
/// ```
pub fn convolve_separable(
    src: &PixelBuffer,
    horizontal: &[f32],
    vertical: &[f32],
) -> OpsResult<PixelBuffer> {
    check_odd(horizontal.len(), vertical.len())?;
    trace!(
        width = src.width(),
        height = src.height(),
        taps_h = horizontal.len(),
        taps_v = vertical.len(),
        "convolve_separable"
    );

    let (w, h) = src.dimensions();
    let width = w as usize;
    let rx = (horizontal.len() / 2) as i64;
    let ry = (vertical.len() / 2) as i64;

    // Horizontal pass into float planes
    let mut temp = try_alloc(src.len(), Rgb::default())?;
    for y in 0..h {
        for x in 0..w {
            let acc = &mut temp[x as usize + y as usize * width];
            for (k, &kw) in horizontal.iter().enumerate() {
                let p = src.sample_clamped(x as i64 + k as i64 - rx, y as i64);
                acc.add_weighted(p, kw);
            }
        }
    }

    // Vertical pass with the same edge clamp
    let mut dst = PixelBuffer::new(w, h)?;
    for (i, out) in dst.pixels_mut().iter_mut().enumerate() {
        let x = i % width;
        let y = (i / width) as i64;
        let mut acc = Rgb::default();
        for (k, &kw) in vertical.iter().enumerate() {
            let sy = px_core::clamp_coord(y + k as i64 - ry, h);
            let t = temp[x + sy * width];
            acc.r += t.r * kw;
            acc.g += t.g * kw;
            acc.b += t.b * kw;
        }
        *out = acc.pack();
    }

    Ok(dst)
}
