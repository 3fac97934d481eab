//! Error types for I/O operations.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported bit depth or color layout.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Decoded data could not become a pixel buffer.
    #[error(transparent)]
    Core(#[from] px_core::Error),
}

impl IoError {
    /// True when the source file was unreadable or yielded no pixels.
    pub fn is_decode_failure(&self) -> bool {
        match self {
            IoError::DecodeError(_) => true,
            IoError::Core(e) => e.is_decode_error(),
            _ => false,
        }
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
