//! # px-io
//!
//! Loading and saving [`PixelBuffer`]s.
//!
//! - **PNG** - every color type, 8 and 16 bit; written as 8-bit RGBA
//! - **JPEG** - RGB, luminance and CMYK; written as RGB
//!
//! Decoded data always passes through [`PixelBuffer::from_rgba8`], so a
//! decoder that yields no pixels or the wrong amount of them is rejected
//! before anything else sees the image.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use px_io::{load_image, save_image};
//!
//! let image = load_image("input.jpg")?;
//! save_image("output.png", &image)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod detect;
mod error;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;

pub use detect::Format;
pub use error::{IoError, IoResult};

use px_core::PixelBuffer;
use std::path::Path;
use tracing::debug;

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

/// Reads an image file, detecting the format from its contents.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The file is corrupted or decodes to no pixel data
pub fn load_image<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;

    let image = match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path)?,
        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path)?,
        #[allow(unreachable_patterns)]
        _ => return Err(unsupported(path)),
    };

    debug!(
        path = %path.display(),
        %format,
        width = image.width(),
        height = image.height(),
        "loaded image"
    );
    Ok(image)
}

/// Decodes an in-memory image, detecting the format from its magic bytes.
pub fn load_from_memory(bytes: &[u8]) -> IoResult<PixelBuffer> {
    match Format::from_bytes(bytes) {
        #[cfg(feature = "png")]
        Format::Png => png::decode(std::io::Cursor::new(bytes)),
        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::decode(bytes),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

/// Writes an image, choosing the format from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created, the extension is not
/// a supported format, or encoding fails.
pub fn save_image<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    match Format::from_extension(path) {
        #[cfg(feature = "png")]
        Format::Png => png::write(path, image)?,
        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, image)?,
        #[allow(unreachable_patterns)]
        _ => return Err(unsupported(path)),
    }
    debug!(path = %path.display(), "saved image");
    Ok(())
}
