//! # px-ops
//!
//! Pixel operations over [`px_core::PixelBuffer`].
//!
//! # Modules
//!
//! - [`channel`] - Red/green/blue extraction by mask
//! - [`grayscale`] - Average and weighted-luminance gray
//! - [`transform`] - Point transforms applied across a buffer
//! - [`filter`] - Kernels and clamp-to-edge 2-D convolution
//! - [`pipeline`] - The standard derivation program feeding an image catalog
//! - `parallel` - Rayon row-parallel variants (feature `parallel`)
//!
//! # Example
//!
//! ```rust
//! use px_core::PixelBuffer;
//! use px_ops::{filter, transform, Kernel, PointOp};
//!
//! let src = PixelBuffer::filled(4, 4, 0xFF30_6090).unwrap();
//! let gray = transform::map_copy(&src, &PointOp::GrayscaleAverage);
//! let edges = filter::convolve(&gray, &Kernel::sobel_horizontal()).unwrap();
//! // Flat input has no edges
//! assert!(edges.pixels().iter().all(|&p| p == 0xFF00_0000));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod channel;
pub mod filter;
pub mod grayscale;
pub mod pipeline;
pub mod transform;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use channel::Channel;
pub use error::{OpsError, OpsResult};
pub use filter::Kernel;
pub use grayscale::{LumaStandard, LumaWeights};
pub use pipeline::{Pipeline, PipelineConfig};
pub use transform::{PixelMapper, PointOp};
