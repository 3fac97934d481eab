//! Single-channel extraction from packed pixels.
//!
//! Each mask keeps one colour byte plus the alpha byte and zeroes the rest,
//! so an extracted pixel stays opaque when its source was.
//!
//! ```rust
//! use px_ops::channel::{extract_blue, extract_green, extract_red};
//!
//! let p = 0xFF33_2211;
//! assert_eq!(extract_red(p), 0xFF00_0011);
//! assert_eq!(extract_red(p) | extract_green(p) | extract_blue(p), p);
//! ```

/// Keeps red and alpha.
pub const RED_MASK: u32 = 0xFF00_00FF;
/// Keeps green and alpha.
pub const GREEN_MASK: u32 = 0xFF00_FF00;
/// Keeps blue and alpha.
pub const BLUE_MASK: u32 = 0xFFFF_0000;

/// Isolates the bytes selected by `mask`.
#[inline]
pub const fn extract_channel(pixel: u32, mask: u32) -> u32 {
    pixel & mask
}

/// Red channel with alpha.
#[inline]
pub const fn extract_red(pixel: u32) -> u32 {
    extract_channel(pixel, RED_MASK)
}

/// Green channel with alpha.
#[inline]
pub const fn extract_green(pixel: u32) -> u32 {
    extract_channel(pixel, GREEN_MASK)
}

/// Blue channel with alpha.
#[inline]
pub const fn extract_blue(pixel: u32) -> u32 {
    extract_channel(pixel, BLUE_MASK)
}

/// A colour channel of a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red, bits 0..8
    Red,
    /// Green, bits 8..16
    Green,
    /// Blue, bits 16..24
    Blue,
}

impl Channel {
    /// All colour channels in packing order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Mask isolating this channel plus alpha.
    #[inline]
    pub const fn mask(self) -> u32 {
        match self {
            Channel::Red => RED_MASK,
            Channel::Green => GREEN_MASK,
            Channel::Blue => BLUE_MASK,
        }
    }

    /// Applies [`mask`](Self::mask) to `pixel`.
    #[inline]
    pub const fn extract(self, pixel: u32) -> u32 {
        extract_channel(pixel, self.mask())
    }

    /// Lowercase channel name.
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = crate::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::Red),
            "g" | "green" => Ok(Channel::Green),
            "b" | "blue" => Ok(Channel::Blue),
            other => Err(crate::OpsError::InvalidParameter(format!(
                "unknown channel '{other}' (expected red, green or blue)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_partition_pixel() {
        let samples = [
            0xFF00_0000u32,
            0xFFFF_FFFF,
            0xFF12_3456,
            0xFFAB_CDEF,
            0xFF80_0001,
        ];
        for p in samples {
            assert_eq!(extract_red(p) | extract_green(p) | extract_blue(p), p, "{p:#010x}");
        }
        // Exhaustive over one byte per channel with opaque alpha
        for v in 0..=255u32 {
            let p = 0xFF00_0000 | v | (255 - v) << 8 | (v ^ 0x5A) << 16;
            assert_eq!(extract_red(p) | extract_green(p) | extract_blue(p), p);
        }
    }

    #[test]
    fn test_alpha_always_kept() {
        for ch in Channel::ALL {
            assert_eq!(ch.extract(0xFF00_0000), 0xFF00_0000);
            assert_eq!(ch.extract(0x7F00_0000), 0x7F00_0000);
        }
    }

    #[test]
    fn test_pure_red_unchanged() {
        assert_eq!(extract_red(0xFF00_00FF), 0xFF00_00FF);
        assert_eq!(extract_red(0xFFFF_FFFF), 0xFF00_00FF);
        assert_eq!(extract_green(0xFFFF_FFFF), 0xFF00_FF00);
        assert_eq!(extract_blue(0xFFFF_FFFF), 0xFFFF_0000);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("Red".parse::<Channel>().unwrap(), Channel::Red);
        assert_eq!("g".parse::<Channel>().unwrap(), Channel::Green);
        assert_eq!("BLUE".parse::<Channel>().unwrap(), Channel::Blue);
        assert!("alpha".parse::<Channel>().is_err());
        assert_eq!(Channel::Blue.name(), "blue");
    }
}
