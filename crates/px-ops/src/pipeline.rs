//! The startup derivation program.
//!
//! [`Pipeline::run`] takes a loaded image and derives the standard set of
//! images from it, registering each one in a catalog in a fixed order:
//!
//! | # | name                          | source            |
//! |---|-------------------------------|-------------------|
//! | 0 | Original                      | loader            |
//! | 1 | Extract red                   | original          |
//! | 2 | Extract green                 | original          |
//! | 3 | Extract blue                  | original          |
//! | 4 | Grayscale average             | original          |
//! | - | Grayscale luminance           | original (opt-in) |
//! | . | Gaussian blur 3x3             | original          |
//! | . | Gaussian blur 5x5             | original          |
//! | . | Edge detection (horizontal)   | grayscale average |
//! | . | Edge detection (vertical)     | grayscale average |
//!
//! ```rust
//! use px_core::PixelBuffer;
//! use px_ops::pipeline::{Pipeline, PipelineConfig};
//!
//! let original = PixelBuffer::filled(8, 8, 0xFF20_4080).unwrap();
//! let catalog = Pipeline::new(PipelineConfig::default()).run(original).unwrap();
//! assert_eq!(catalog.len(), 9);
//! assert_eq!(catalog.original().unwrap().name(), "Original");
//! ```

use crate::filter::{self, Kernel};
use crate::grayscale::LumaStandard;
use crate::transform::{self, PointOp};
use crate::{OpsError, OpsResult};
use px_core::{CatalogBuilder, ImageCatalog, PixelBuffer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entry names used by [`Pipeline::run`].
pub mod names {
    /// Loaded image
    pub const ORIGINAL: &str = "Original";
    /// Red extract
    pub const EXTRACT_RED: &str = "Extract red";
    /// Green extract
    pub const EXTRACT_GREEN: &str = "Extract green";
    /// Blue extract
    pub const EXTRACT_BLUE: &str = "Extract blue";
    /// Average gray
    pub const GRAYSCALE_AVERAGE: &str = "Grayscale average";
    /// Luminance gray
    pub const GRAYSCALE_LUMINANCE: &str = "Grayscale luminance";
    /// 3x3 binomial blur
    pub const GAUSSIAN_3X3: &str = "Gaussian blur 3x3";
    /// 5x5 binomial blur
    pub const GAUSSIAN_5X5: &str = "Gaussian blur 5x5";
    /// Horizontal Sobel
    pub const EDGES_HORIZONTAL: &str = "Edge detection (horizontal)";
    /// Vertical Sobel
    pub const EDGES_VERTICAL: &str = "Edge detection (vertical)";
}

/// Pipeline settings, loadable from YAML.
///
/// ```rust
/// use px_ops::pipeline::PipelineConfig;
/// use px_ops::grayscale::LumaStandard;
///
/// let cfg: PipelineConfig = serde_yaml::from_str("luma: rec601\nluminance: true\n").unwrap();
/// assert_eq!(cfg.luma, LumaStandard::Rec601);
/// assert!(cfg.luminance);
/// assert_eq!(cfg.sobel_factor, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Weights for the luminance entry.
    pub luma: LumaStandard,
    /// Add a "Grayscale luminance" entry after the average one.
    pub luminance: bool,
    /// Scale applied to both Sobel kernels.
    pub sobel_factor: f32,
    /// Use the rayon-backed operations when available.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            luma: LumaStandard::Rec709,
            luminance: false,
            sobel_factor: filter::SOBEL_FACTOR,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl PipelineConfig {
    /// Checks values that serde cannot.
    pub fn validate(&self) -> OpsResult<()> {
        if !self.sobel_factor.is_finite() {
            return Err(OpsError::InvalidParameter(format!(
                "sobel_factor must be finite, got {}",
                self.sobel_factor
            )));
        }
        Ok(())
    }
}

/// Runs the derivation program over one original image.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with the given settings.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Convolves with the parallel engine when enabled.
    pub fn convolve(&self, src: &PixelBuffer, kernel: &Kernel) -> OpsResult<PixelBuffer> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return crate::parallel::convolve(src, kernel);
            }
        }
        filter::convolve(src, kernel)
    }

    /// Copies `src` and applies `op` to the copy.
    pub fn map(&self, src: &PixelBuffer, op: PointOp) -> PixelBuffer {
        let mut out = src.clone();
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                crate::parallel::apply(&mut out, &op);
                return out;
            }
        }
        transform::apply(&mut out, &op);
        out
    }

    /// Derives every image from `original` and returns the frozen catalog.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when a buffer cannot be allocated.
    pub fn run(&self, original: PixelBuffer) -> OpsResult<ImageCatalog> {
        self.config.validate()?;
        let (w, h) = original.dimensions();
        debug!(w, h, config = ?self.config, "pipeline start");

        let mut catalog = CatalogBuilder::new();
        let src = catalog.add(names::ORIGINAL, original);

        for (name, op) in [
            (names::EXTRACT_RED, PointOp::ExtractRed),
            (names::EXTRACT_GREEN, PointOp::ExtractGreen),
            (names::EXTRACT_BLUE, PointOp::ExtractBlue),
        ] {
            let img = self.map(image(&catalog, src)?, op);
            catalog.add(name, img);
        }

        let img = self.map(image(&catalog, src)?, PointOp::GrayscaleAverage);
        let gray = catalog.add(names::GRAYSCALE_AVERAGE, img);

        if self.config.luminance {
            let op = PointOp::GrayscaleLuminance(self.config.luma.weights());
            let img = self.map(image(&catalog, src)?, op);
            catalog.add(names::GRAYSCALE_LUMINANCE, img);
        }

        for (name, kernel) in [
            (names::GAUSSIAN_3X3, Kernel::gaussian_3x3()),
            (names::GAUSSIAN_5X5, Kernel::gaussian_5x5()),
        ] {
            let img = self.convolve(image(&catalog, src)?, &kernel)?;
            catalog.add(name, img);
        }

        let factor = self.config.sobel_factor;
        for (name, kernel) in [
            (names::EDGES_HORIZONTAL, Kernel::sobel_horizontal_scaled(factor)),
            (names::EDGES_VERTICAL, Kernel::sobel_vertical_scaled(factor)),
        ] {
            let img = self.convolve(image(&catalog, gray)?, &kernel)?;
            catalog.add(name, img);
        }

        debug!(entries = catalog.len(), "pipeline done");
        Ok(catalog.build())
    }
}

/// Looks up an entry the pipeline registered earlier.
fn image(catalog: &CatalogBuilder, index: usize) -> OpsResult<&PixelBuffer> {
    catalog
        .get(index)
        .map(|e| e.image())
        .ok_or_else(|| OpsError::InvalidParameter(format!("no catalog entry at index {index}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::extract_red;
    use crate::grayscale::grayscale_average;
    use px_core::pixel;

    fn sample() -> PixelBuffer {
        let mut img = PixelBuffer::new(6, 4).unwrap();
        for y in 0..4u32 {
            for x in 0..6u32 {
                let p = pixel::pack_opaque((x * 40) as u8, (y * 60) as u8, 200);
                img.set_pixel(x, y, p).unwrap();
            }
        }
        img
    }

    #[test]
    fn test_default_order() {
        let catalog = Pipeline::default().run(sample()).unwrap();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            [
                names::ORIGINAL,
                names::EXTRACT_RED,
                names::EXTRACT_GREEN,
                names::EXTRACT_BLUE,
                names::GRAYSCALE_AVERAGE,
                names::GAUSSIAN_3X3,
                names::GAUSSIAN_5X5,
                names::EDGES_HORIZONTAL,
                names::EDGES_VERTICAL,
            ]
        );
        for entry in &catalog {
            assert_eq!(entry.image().dimensions(), (6, 4));
        }
    }

    #[test]
    fn test_luminance_entry_opt_in() {
        let config = PipelineConfig {
            luminance: true,
            luma: LumaStandard::Rec601,
            ..Default::default()
        };
        let catalog = Pipeline::new(config).run(sample()).unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get(5).unwrap().name(), names::GRAYSCALE_LUMINANCE);
    }

    #[test]
    fn test_entries_derive_from_original() {
        let src = sample();
        let catalog = Pipeline::default().run(src.clone()).unwrap();
        assert_eq!(catalog.original().unwrap().image(), &src);

        let red = catalog.find(names::EXTRACT_RED).unwrap().image();
        for (r, s) in red.pixels().iter().zip(src.pixels()) {
            assert_eq!(*r, extract_red(*s));
        }
    }

    #[test]
    fn test_edges_use_grayscale_entry() {
        let src = sample();
        let catalog = Pipeline::default().run(src.clone()).unwrap();

        let mut gray = src.clone();
        for p in gray.pixels_mut() {
            *p = grayscale_average(*p);
        }
        let expected = filter::convolve(&gray, &Kernel::sobel_vertical()).unwrap();
        let edges = catalog.find(names::EDGES_VERTICAL).unwrap().image();
        assert_eq!(edges, &expected);
        // Edge images are gray since their source is
        for &p in edges.pixels() {
            assert_eq!(pixel::red(p), pixel::green(p));
            assert_eq!(pixel::green(p), pixel::blue(p));
        }
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let seq = Pipeline::new(PipelineConfig { parallel: false, ..Default::default() })
            .run(sample())
            .unwrap();
        let par = Pipeline::new(PipelineConfig { parallel: true, ..Default::default() })
            .run(sample())
            .unwrap();
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.image(), b.image());
        }
    }

    #[test]
    fn test_invalid_sobel_factor() {
        let config = PipelineConfig {
            sobel_factor: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(config).run(sample()),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_config_yaml_defaults() {
        let cfg: PipelineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        let text = serde_yaml::to_string(&cfg).unwrap();
        assert!(text.contains("luma: rec709"));
    }
}
