//! Image info command

use crate::InfoArgs;
use anyhow::Result;
use px_io::Format;
use std::fs;

/// Format file size for display
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)?.len();
        let format = Format::detect(path).unwrap_or(Format::Unknown);
        let image = super::load_image(path)?;

        println!("{}", path.display());
        println!("  Format:     {format}");
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Pixels:     {}", image.len());
        println!("  File size:  {}", format_size(file_size));
        println!("  Opaque:     {}", if image.is_opaque() { "yes" } else { "no" });
        if verbose > 0 {
            println!("  {image:?}");
        }

        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}
