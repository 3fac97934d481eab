//! CLI command implementations

pub mod blur;
pub mod channel;
pub mod convolve;
pub mod edges;
pub mod grayscale;
pub mod info;
pub mod run;

use anyhow::{Context, Result};
use px_core::{DisplaySink, PixelBuffer};
use px_ops::{Pipeline, PipelineConfig};
use std::path::{Path, PathBuf};

/// Engine for the single-operation commands.
///
/// Uses the default config, so work is spread over the global rayon pool
/// that `-j/--threads` sizes.
pub fn engine() -> Pipeline {
    Pipeline::new(PipelineConfig::default())
}

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    px_io::load_image(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    px_io::save_image(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Turns an entry name into a file-name fragment: `"Edge detection (vertical)"`
/// becomes `"edge_detection_vertical"`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Display sink that writes each uploaded image as `NN_<slug>.png`.
///
/// The handle is the written path.
pub struct FileSink {
    dir: PathBuf,
    next: usize,
}

impl FileSink {
    /// Creates the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create: {}", dir.display()))?;
        Ok(Self { dir, next: 0 })
    }
}

impl DisplaySink for FileSink {
    type Handle = PathBuf;

    fn upload(&mut self, name: &str, pixels: &[u32], width: u32, height: u32) -> px_core::Result<PathBuf> {
        let path = self.dir.join(format!("{:02}_{}.png", self.next, slug(name)));
        let image = PixelBuffer::from_pixels(width, height, pixels.to_vec())?;
        px_io::save_image(&path, &image).map_err(|e| px_core::Error::display(name, e.to_string()))?;
        tracing::debug!(name, path = %path.display(), "exported");
        self.next += 1;
        Ok(path)
    }
}
