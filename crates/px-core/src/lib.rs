//! # px-core
//!
//! Core types for in-memory raster processing.
//!
//! - [`PixelBuffer`] - Owned grid of packed 32-bit RGBA pixels
//! - [`pixel`] - Packing helpers and channel layout constants
//! - [`ImageCatalog`], [`CatalogBuilder`] - Ordered registry of named images
//! - [`DisplaySink`] - Collaborator that turns pixels into display handles
//! - [`Error`] - Error type shared by the constructors in this crate
//!
//! ## Crate Structure
//!
//! ```text
//! px-core (this crate)
//!    ^
//!    |
//!    +-- px-ops (channel ops, point transforms, convolution, pipeline)
//!    +-- px-io  (PNG/JPEG loading and saving)
//!    +-- px-cli (the `px` binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod catalog;
pub mod error;
pub mod pixel;

pub use buffer::{PixelBuffer, clamp_coord};
pub use catalog::{CatalogBuilder, CatalogEntry, DisplaySink, ImageCatalog, Presented};
pub use error::{Error, Result};
pub use pixel::ALPHA_OPAQUE;
