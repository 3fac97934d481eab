//! PNG format support.
//!
//! Reading accepts every PNG color type. Palette and sub-byte images are
//! expanded by the decoder; 16-bit samples keep their high byte. Sources
//! without alpha become opaque.
//!
//! Writing always produces 8-bit RGBA.
//!
//! # Example
//!
//! ```rust,ignore
//! use px_io::png;
//!
//! let image = png::read("input.png")?;
//! png::write("output.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use px_core::PixelBuffer;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::Path;
use tracing::trace;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decodes a PNG stream.
pub fn decode<R: BufRead + Seek>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    trace!(
        width = info.width,
        height = info.height,
        color = ?info.color_type,
        depth = ?info.bit_depth,
        "png::decode"
    );

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{other:?} {:?}",
                info.bit_depth
            )));
        }
    };
    let sample_bytes = match info.bit_depth {
        png::BitDepth::Eight => 1,
        png::BitDepth::Sixteen => 2,
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {other:?}",
                info.color_type
            )));
        }
    };

    let data = &buf[..info.buffer_size()];
    let rgba = expand_to_rgba8(data, channels, sample_bytes);
    Ok(PixelBuffer::from_rgba8(info.width, info.height, &rgba)?)
}

/// Converts interleaved 1-4 channel samples to RGBA8.
///
/// Multi-byte samples are big-endian; only the high byte is kept.
fn expand_to_rgba8(data: &[u8], channels: usize, sample_bytes: usize) -> Vec<u8> {
    let stride = channels * sample_bytes;
    let mut out = Vec::with_capacity(data.len() / stride * 4);
    for px in data.chunks_exact(stride) {
        let s = |i: usize| px[i * sample_bytes];
        let rgba = match channels {
            1 => [s(0), s(0), s(0), u8::MAX],
            2 => [s(0), s(0), s(0), s(1)],
            3 => [s(0), s(1), s(2), u8::MAX],
            _ => [s(0), s(1), s(2), s(3)],
        };
        out.extend_from_slice(&rgba);
    }
    out
}

/// Writes a buffer to a PNG file as 8-bit RGBA.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Encodes a buffer as an 8-bit RGBA PNG stream.
pub fn encode<W: Write>(writer: W, image: &PixelBuffer) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&image.to_rgba8())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use px_core::pixel;
    use std::io::Cursor;

    fn encode_raw(w: u32, h: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut enc = png::Encoder::new(&mut out, w, h);
            enc.set_color(color);
            enc.set_depth(depth);
            let mut wr = enc.write_header().unwrap();
            wr.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_roundtrip_rgba() {
        let mut image = PixelBuffer::new(16, 8).unwrap();
        for y in 0..8u32 {
            for x in 0..16u32 {
                let p = pixel::pack((x * 16) as u8, (y * 32) as u8, 64, (x * 8 + y) as u8);
                image.set_pixel(x, y, p).unwrap();
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        write(&path, &image).unwrap();
        let loaded = read(&path).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgb, png::BitDepth::Eight, &[10, 20, 30, 40, 50, 60]);
        let img = decode(Cursor::new(bytes)).unwrap();
        assert_eq!(img.pixels(), &[pixel::pack_opaque(10, 20, 30), pixel::pack_opaque(40, 50, 60)]);
    }

    #[test]
    fn test_gray_alpha_expands() {
        let bytes = encode_raw(2, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[7, 128, 200, 255]);
        let img = decode(Cursor::new(bytes)).unwrap();
        assert_eq!(img.pixels(), &[pixel::pack(7, 7, 7, 128), pixel::pack_gray(200)]);
    }

    #[test]
    fn test_sixteen_bit_keeps_high_byte() {
        // One gray pixel: 0xAB12 big-endian
        let bytes = encode_raw(1, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen, &[0xAB, 0x12]);
        let img = decode(Cursor::new(bytes)).unwrap();
        assert_eq!(img.pixel(0, 0), Some(pixel::pack_gray(0xAB)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode(Cursor::new(b"not a png at all".to_vec())).unwrap_err();
        assert!(err.is_decode_failure());
    }
}
