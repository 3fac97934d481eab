//! Edge detection command
//!
//! Converts to average gray first, then applies a scaled Sobel kernel.

use crate::{Direction, EdgesArgs};
use anyhow::Result;
use px_ops::Kernel;
use px_ops::transform::PointOp;
use tracing::{info, trace};

pub fn run(args: EdgesArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), direction = ?args.direction, factor = args.factor, "edges::run");

    let kernel = match args.direction {
        Direction::Horizontal => Kernel::sobel_horizontal_scaled(args.factor),
        Direction::Vertical => Kernel::sobel_vertical_scaled(args.factor),
    };

    let engine = super::engine();
    let image = super::load_image(&args.input)?;
    let gray = engine.map(&image, PointOp::GrayscaleAverage);
    info!(direction = ?args.direction, "Detecting edges");
    let edges = engine.convolve(&gray, &kernel)?;
    super::save_image(&args.output, &edges)?;

    if verbose > 0 {
        println!("Wrote {:?} edges to {}", args.direction, args.output.display());
    }
    Ok(())
}
