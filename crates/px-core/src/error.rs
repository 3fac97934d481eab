//! Error types for px-core operations.
//!
//! Every construction entry point in this crate returns a [`Result`] instead
//! of aborting, so callers can surface a reason for failures that the
//! pipeline cannot recover from (bad dimensions, failed allocation, missing
//! pixel data from a decoder).
//!
//! # Usage
//!
//! ```rust
//! use px_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! assert!(check(4, 0, 4, 4).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while creating or accessing pixel buffers and
/// catalogs.
///
/// # Categories
///
/// - **Dimension errors**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`DataLength`](Error::DataLength)
/// - **Allocation errors**: [`AllocationFailed`](Error::AllocationFailed)
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds)
/// - **Decode errors**: [`MissingPixelData`](Error::MissingPixelData)
/// - **Display errors**: [`Display`](Error::Display)
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, or `width * height` overflows.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// The supplied pixel data does not match `width * height`.
    #[error("data length {got} does not match {width}x{height} (expected {expected})")]
    DataLength {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
        /// Expected element count
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// Memory allocation failed.
    ///
    /// Returned when the allocator refuses the reservation for a pixel
    /// buffer. There is no retry or fallback.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// A decoder produced no pixel data.
    ///
    /// Such a buffer is invalid input and is rejected before any transform
    /// or convolution touches it.
    #[error("missing pixel data: {0}")]
    MissingPixelData(String),

    /// The display collaborator failed to produce a handle.
    #[error("display failed for '{name}': {reason}")]
    Display {
        /// Catalog entry name
        name: String,
        /// Failure reason
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::Display`] error.
    #[inline]
    pub fn display(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Display {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }

    /// Returns `true` if the error stems from unusable decoder output.
    #[inline]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::MissingPixelData(_) | Self::DataLength { .. })
    }
}
