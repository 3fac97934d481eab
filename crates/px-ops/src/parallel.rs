//! Parallel image processing operations using Rayon.
//!
//! The destination is split into disjoint rows with `par_chunks_mut`; every
//! row reads only the immutable source, so results are identical to the
//! single-threaded functions in [`crate::filter`] and [`crate::transform`].
//!
//! # Example
//!
//! ```rust
//! use px_core::PixelBuffer;
//! use px_ops::filter::Kernel;
//! use px_ops::parallel;
//!
//! let src = PixelBuffer::filled(256, 256, 0xFF80_4020).unwrap();
//! let blurred = parallel::convolve(&src, &Kernel::gaussian_5x5()).unwrap();
//! assert_eq!(blurred, src);
//! ```

use crate::OpsResult;
use crate::filter::{Kernel, convolve_at};
use crate::transform::PixelMapper;
use px_core::PixelBuffer;
use rayon::prelude::*;
use tracing::trace;

/// Parallel convolution.
///
/// Same contract as [`crate::filter::convolve`].
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel_w = kernel.width(),
        kernel_h = kernel.height(),
        "parallel::convolve"
    );

    let mut dst = PixelBuffer::new(src.width(), src.height())?;
    let width = src.width() as usize;

    dst.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                *out = convolve_at(src, kernel, x as u32, y as u32);
            }
        });

    Ok(dst)
}

/// Parallel in-place point transform.
///
/// Same contract as [`crate::transform::apply`].
pub fn apply<M: PixelMapper + Sync + ?Sized>(buffer: &mut PixelBuffer, mapper: &M) {
    trace!(width = buffer.width(), height = buffer.height(), "parallel::apply");
    let width = buffer.width() as usize;
    buffer
        .pixels_mut()
        .par_chunks_mut(width)
        .for_each(|row| {
            for p in row {
                *p = mapper.map(*p);
            }
        });
}
