//! Integration tests for the px crates.
//!
//! End-to-end checks across loading, the derivation pipeline, the catalog
//! and export.

#[cfg(test)]
mod tests {
    use px_core::{DisplaySink, ImageCatalog, PixelBuffer, pixel};
    use px_ops::channel::{extract_blue, extract_green, extract_red};
    use px_ops::pipeline::names;
    use px_ops::{Kernel, LumaStandard, Pipeline, PipelineConfig, filter};
    use tempfile::tempdir;

    /// Keeps copies of everything it receives.
    #[derive(Default)]
    struct MemorySink {
        received: Vec<(String, PixelBuffer)>,
    }

    impl DisplaySink for MemorySink {
        type Handle = usize;

        fn upload(&mut self, name: &str, pixels: &[u32], width: u32, height: u32) -> px_core::Result<usize> {
            let image = PixelBuffer::from_pixels(width, height, pixels.to_vec())?;
            self.received.push((name.to_string(), image));
            Ok(self.received.len() - 1)
        }
    }

    fn photo(w: u32, h: u32) -> PixelBuffer {
        let mut img = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let r = (x * 255 / (w - 1).max(1)) as u8;
                let g = (y * 255 / (h - 1).max(1)) as u8;
                let b = ((x + y) * 17 % 256) as u8;
                img.set_pixel(x, y, pixel::pack_opaque(r, g, b)).unwrap();
            }
        }
        img
    }

    fn run_default(img: PixelBuffer) -> ImageCatalog {
        Pipeline::new(PipelineConfig::default()).run(img).unwrap()
    }

    #[test]
    fn test_png_load_pipeline_present() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.png");
        let src = photo(40, 30);
        px_io::save_image(&path, &src).unwrap();

        let loaded = px_io::load_image(&path).unwrap();
        assert_eq!(loaded, src);

        let catalog = run_default(loaded);
        let mut sink = MemorySink::default();
        let presented = catalog.present(&mut sink).unwrap();

        assert_eq!(presented.len(), catalog.len());
        for (i, (p, entry)) in presented.iter().zip(&catalog).enumerate() {
            assert_eq!(p.handle, i);
            assert_eq!(p.name, entry.name());
            assert_eq!((p.width, p.height), (40, 30));
            assert_eq!(&sink.received[i].1, entry.image());
        }
    }

    #[test]
    fn test_jpeg_input_pipeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.jpg");
        px_io::save_image(&path, &photo(32, 16)).unwrap();

        let loaded = px_io::load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (32, 16));
        assert!(loaded.is_opaque());

        let catalog = run_default(loaded);
        for name in [names::GRAYSCALE_AVERAGE, names::EDGES_HORIZONTAL, names::EDGES_VERTICAL] {
            for &p in catalog.find(name).unwrap().image().pixels() {
                assert_eq!(pixel::red(p), pixel::green(p), "{name}");
                assert_eq!(pixel::green(p), pixel::blue(p), "{name}");
            }
        }
    }

    #[test]
    fn test_exported_files_match_catalog() {
        let dir = tempdir().unwrap();
        let catalog = run_default(photo(9, 7));

        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        for (i, entry) in catalog.iter().enumerate() {
            px_io::save_image(out.join(format!("{i:02}.png")), entry.image()).unwrap();
        }
        for (i, entry) in catalog.iter().enumerate() {
            let back = px_io::load_image(out.join(format!("{i:02}.png"))).unwrap();
            assert_eq!(&back, entry.image(), "{}", entry.name());
        }
    }

    #[test]
    fn test_bad_input_rejected_before_processing() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.png");
        std::fs::write(&empty, b"").unwrap();
        assert!(px_io::load_image(&empty).unwrap_err().is_decode_failure());

        let truncated = dir.path().join("cut.jpg");
        std::fs::write(&truncated, [0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap();
        assert!(px_io::load_image(&truncated).is_err());

        assert!(PixelBuffer::from_rgba8(4, 4, &[]).unwrap_err().is_decode_error());
    }

    #[test]
    fn test_yaml_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "luma: rec601\nluminance: true\nsobel_factor: 1.0\nparallel: false\n").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let config: PipelineConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(config.luma, LumaStandard::Rec601);
        approx::assert_abs_diff_eq!(config.sobel_factor, 1.0);

        let src = photo(12, 12);
        let catalog = Pipeline::new(config).run(src.clone()).unwrap();
        assert_eq!(catalog.len(), 10);

        let mut gray = src;
        for p in gray.pixels_mut() {
            *p = px_ops::grayscale::grayscale_average(*p);
        }
        let expected = filter::convolve(&gray, &Kernel::sobel_horizontal_scaled(1.0)).unwrap();
        assert_eq!(catalog.find(names::EDGES_HORIZONTAL).unwrap().image(), &expected);
    }

    #[test]
    fn test_channel_masks_partition_pixels() {
        let src = photo(64, 64);
        for &p in src.pixels() {
            assert_eq!(extract_red(p) | extract_green(p) | extract_blue(p), p);
        }
    }

    #[test]
    fn test_white_fixed_point_through_blurs() {
        let white = PixelBuffer::filled(3, 3, 0xFFFF_FFFF).unwrap();
        let catalog = run_default(white.clone());
        assert_eq!(catalog.find(names::GAUSSIAN_3X3).unwrap().image(), &white);
        assert_eq!(catalog.find(names::GAUSSIAN_5X5).unwrap().image(), &white);
    }

    #[test]
    fn test_degenerate_shapes() {
        // Single pixel, single row and single column all clamp to themselves
        for (w, h) in [(1, 1), (17, 1), (1, 17)] {
            let catalog = run_default(photo(w, h));
            for entry in &catalog {
                assert_eq!(entry.image().dimensions(), (w, h), "{}", entry.name());
                assert!(entry.image().is_opaque());
            }
        }
    }

    #[test]
    fn test_identity_kernel_on_loaded_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("id.png");
        px_io::save_image(&path, &photo(20, 11)).unwrap();
        let img = px_io::load_image(&path).unwrap();
        assert_eq!(filter::convolve(&img, &Kernel::identity()).unwrap(), img);
    }
}
