//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Kernel dimensions or data violate the odd-size precondition.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer construction or access failed.
    #[error(transparent)]
    Core(#[from] px_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
