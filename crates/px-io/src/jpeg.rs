//! JPEG format support.
//!
//! Decoding handles RGB, 8/16-bit luminance and CMYK sources; everything is
//! converted to opaque RGBA. Encoding writes baseline RGB and drops alpha.

use crate::{IoError, IoResult};
use px_core::{PixelBuffer, pixel};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Quality used by [`write`].
pub const DEFAULT_QUALITY: u8 = 90;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    decode(file)
}

/// Decodes a JPEG stream.
pub fn decode<R: Read>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    trace!(width, height, format = ?info.pixel_format, "jpeg::decode");

    let rgba: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], u8::MAX])
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, u8::MAX]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l| [l[0], l[0], l[0], u8::MAX])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let [r, g, b] = cmyk_to_rgb(cmyk[0], cmyk[1], cmyk[2], cmyk[3]);
                [r, g, b, u8::MAX]
            })
            .collect(),
    };

    Ok(PixelBuffer::from_rgba8(width, height, &rgba)?)
}

/// Naive CMYK to RGB without a color profile.
fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let k = 1.0 - k as f32 / 255.0;
    let ch = |v: u8| pixel::quantize((1.0 - v as f32 / 255.0) * k * 255.0);
    [ch(c), ch(m), ch(y)]
}

/// Writes a buffer to a JPEG file at [`DEFAULT_QUALITY`].
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    write_with_quality(path, image, DEFAULT_QUALITY)
}

/// Writes a buffer to a JPEG file with quality `1..=100`.
pub fn write_with_quality<P: AsRef<Path>>(path: P, image: &PixelBuffer, quality: u8) -> IoResult<()> {
    let bytes = encode(image, quality)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Encodes a buffer into an in-memory JPEG.
pub fn encode(image: &PixelBuffer, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let too_large = || {
        IoError::EncodeError(format!(
            "{}x{} exceeds the JPEG limit of {}",
            image.width(),
            image.height(),
            u16::MAX
        ))
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;

    let rgb: Vec<u8> = image
        .pixels()
        .iter()
        .flat_map(|&p| [pixel::red(p), pixel::green(p), pixel::blue(p)])
        .collect();

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode(&rgb, width, height, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_flat_color() {
        let image = PixelBuffer::filled(16, 16, pixel::pack_opaque(200, 100, 50)).unwrap();
        let bytes = encode(&image, 95).unwrap();
        let loaded = decode(&bytes[..]).unwrap();
        assert_eq!(loaded.dimensions(), (16, 16));
        // Lossy, but a flat block survives closely
        for &p in loaded.pixels() {
            assert!((pixel::red(p) as i32 - 200).abs() <= 3);
            assert!((pixel::green(p) as i32 - 100).abs() <= 3);
            assert!((pixel::blue(p) as i32 - 50).abs() <= 3);
            assert_eq!(pixel::alpha(p), 255);
        }
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = PixelBuffer::filled(8, 4, 0xFF00_0000).unwrap();
        write(&path, &image).unwrap();
        assert_eq!(read(&path).unwrap().dimensions(), (8, 4));
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(0, 0, 0, 0), [255, 255, 255]);
        assert_eq!(cmyk_to_rgb(0, 0, 0, 255), [0, 0, 0]);
        assert_eq!(cmyk_to_rgb(255, 0, 255, 0), [0, 255, 0]);
    }

    #[test]
    fn test_truncated_stream() {
        let err = decode(&[0xFF, 0xD8, 0xFF][..]).unwrap_err();
        assert!(err.is_decode_failure());
    }
}
