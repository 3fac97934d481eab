//! Pipeline command
//!
//! Derives the full image catalog from one input and exports every entry.

use super::FileSink;
use crate::RunArgs;
use anyhow::{Context, Result};
use px_ops::{Pipeline, PipelineConfig};
use std::path::Path;
use tracing::{info, trace};

fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

pub fn run(args: RunArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "run::run");

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(luma) = args.luma {
        config.luma = luma;
    }
    config.luminance |= args.luminance;
    if args.sequential {
        config.parallel = false;
    }

    let original = super::load_image(&args.input)?;
    info!(w = original.width(), h = original.height(), "Running pipeline");

    let catalog = Pipeline::new(config).run(original).context("Pipeline failed")?;
    let mut sink = FileSink::new(&args.output)?;
    let presented = catalog.present(&mut sink).context("Export failed")?;

    for (i, p) in presented.iter().enumerate() {
        println!("{:>2}  {:<28} {:>5}x{:<5} {}", i, p.name, p.width, p.height, p.handle.display());
    }
    if verbose > 0 {
        println!("Exported {} images to {}", presented.len(), args.output.display());
    }

    Ok(())
}
