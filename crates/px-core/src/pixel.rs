//! Packed 32-bit RGBA pixels.
//!
//! A pixel is a `u32` holding four 8-bit channels. Red sits in the lowest
//! byte, followed by green, blue and alpha:
//!
//! ```text
//! bits:  31..24  23..16  15..8   7..0
//!        alpha   blue    green   red
//! ```
//!
//! This is the little-endian reading of an `[R, G, B, A]` byte quadruple,
//! which is what codecs hand out for 8-bit RGBA images.
//!
//! # Example
//!
//! ```rust
//! use px_core::pixel::{pack, unpack, ALPHA_OPAQUE};
//!
//! let p = pack(0x11, 0x22, 0x33, 0xFF);
//! assert_eq!(p, 0xFF33_2211);
//! assert_eq!(unpack(p), [0x11, 0x22, 0x33, 0xFF]);
//! assert_eq!(p & ALPHA_OPAQUE, ALPHA_OPAQUE);
//! ```

/// Alpha byte set to fully opaque, all colour bytes zero.
pub const ALPHA_OPAQUE: u32 = 0xFF00_0000;

/// Bit shift of the red channel.
pub const RED_SHIFT: u32 = 0;
/// Bit shift of the green channel.
pub const GREEN_SHIFT: u32 = 8;
/// Bit shift of the blue channel.
pub const BLUE_SHIFT: u32 = 16;
/// Bit shift of the alpha channel.
pub const ALPHA_SHIFT: u32 = 24;

/// Rec.709 luminance coefficients as an array [R, G, B].
pub const REC709_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Rec.601 luminance coefficients as an array [R, G, B].
pub const REC601_LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Packs four channel bytes into a pixel.
#[inline]
pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) << RED_SHIFT
        | (g as u32) << GREEN_SHIFT
        | (b as u32) << BLUE_SHIFT
        | (a as u32) << ALPHA_SHIFT
}

/// Packs three colour bytes with opaque alpha.
#[inline]
pub const fn pack_opaque(r: u8, g: u8, b: u8) -> u32 {
    ALPHA_OPAQUE | (r as u32) << RED_SHIFT | (g as u32) << GREEN_SHIFT | (b as u32) << BLUE_SHIFT
}

/// Packs a gray level into all three colour channels with opaque alpha.
#[inline]
pub const fn pack_gray(v: u8) -> u32 {
    pack_opaque(v, v, v)
}

/// Splits a pixel into `[R, G, B, A]` bytes.
#[inline]
pub const fn unpack(p: u32) -> [u8; 4] {
    p.to_le_bytes()
}

/// Red channel byte.
#[inline]
pub const fn red(p: u32) -> u8 {
    (p >> RED_SHIFT) as u8
}

/// Green channel byte.
#[inline]
pub const fn green(p: u32) -> u8 {
    (p >> GREEN_SHIFT) as u8
}

/// Blue channel byte.
#[inline]
pub const fn blue(p: u32) -> u8 {
    (p >> BLUE_SHIFT) as u8
}

/// Alpha channel byte.
#[inline]
pub const fn alpha(p: u32) -> u8 {
    (p >> ALPHA_SHIFT) as u8
}

/// Converts a floating point channel sum to a byte.
///
/// Rounds to nearest and saturates at `[0, 255]`. NaN maps to 0.
#[inline]
pub fn quantize(v: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    v.round() as u8
}
