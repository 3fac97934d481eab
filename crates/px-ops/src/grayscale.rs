//! Grayscale conversions of packed pixels.
//!
//! Two variants, both writing the same gray level into red, green and blue
//! with opaque alpha:
//!
//! - [`grayscale_luminance`] - weighted sum with explicit [`LumaWeights`]
//! - [`grayscale_average`] - `(r + g + b) / 3`, truncating
//!
//! ```rust
//! use px_ops::grayscale::{grayscale_average, grayscale_luminance, LumaWeights};
//!
//! assert_eq!(grayscale_average(0xFF00_0003), 0xFF01_0101);
//! assert_eq!(grayscale_luminance(0xFFFF_FFFF, LumaWeights::REC709), 0xFFFF_FFFF);
//! ```

use crate::{OpsError, OpsResult};
use px_core::pixel::{self, REC601_LUMA, REC709_LUMA};
use serde::{Deserialize, Serialize};

/// Per-channel weights for luminance conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaWeights {
    /// Red weight
    pub r: f32,
    /// Green weight
    pub g: f32,
    /// Blue weight
    pub b: f32,
}

impl LumaWeights {
    /// ITU-R BT.709 weights (0.2126, 0.7152, 0.0722).
    pub const REC709: Self = Self {
        r: REC709_LUMA[0],
        g: REC709_LUMA[1],
        b: REC709_LUMA[2],
    };

    /// ITU-R BT.601 weights (0.299, 0.587, 0.114).
    pub const REC601: Self = Self {
        r: REC601_LUMA[0],
        g: REC601_LUMA[1],
        b: REC601_LUMA[2],
    };

    /// Custom weights.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] for negative or non-finite
    /// weights.
    pub fn new(r: f32, g: f32, b: f32) -> OpsResult<Self> {
        if [r, g, b].iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "luma weights must be finite and >= 0, got ({r}, {g}, {b})"
            )));
        }
        Ok(Self { r, g, b })
    }

    /// Sum of the three weights.
    #[inline]
    pub fn sum(&self) -> f32 {
        self.r + self.g + self.b
    }
}

impl Default for LumaWeights {
    fn default() -> Self {
        Self::REC709
    }
}

/// Named luminance standard, as used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LumaStandard {
    /// Rec.709 / sRGB primaries
    #[default]
    Rec709,
    /// Rec.601 / NTSC primaries
    Rec601,
}

impl LumaStandard {
    /// Weights for this standard.
    pub const fn weights(self) -> LumaWeights {
        match self {
            LumaStandard::Rec709 => LumaWeights::REC709,
            LumaStandard::Rec601 => LumaWeights::REC601,
        }
    }
}

impl std::str::FromStr for LumaStandard {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['.', '-', '_'], "").as_str() {
            "rec709" | "bt709" | "709" => Ok(LumaStandard::Rec709),
            "rec601" | "bt601" | "601" => Ok(LumaStandard::Rec601),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown luma standard '{other}' (expected rec709 or rec601)"
            ))),
        }
    }
}

/// Luminance-weighted gray.
///
/// The weighted sum is rounded to nearest and saturated at 255.
#[inline]
pub fn grayscale_luminance(p: u32, weights: LumaWeights) -> u32 {
    let r = pixel::red(p) as f32;
    let g = pixel::green(p) as f32;
    let b = pixel::blue(p) as f32;
    let y = r * weights.r + g * weights.g + b * weights.b;
    pixel::pack_gray(pixel::quantize(y))
}

/// Average gray, truncating: `(r + g + b) / 3`.
#[inline]
pub fn grayscale_average(p: u32) -> u32 {
    let sum = pixel::red(p) as u32 + pixel::green(p) as u32 + pixel::blue(p) as u32;
    pixel::pack_gray((sum / 3) as u8)
}
