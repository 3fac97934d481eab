//! Grayscale command

use crate::{GrayMethod, GrayscaleArgs};
use anyhow::Result;
use px_ops::transform::PointOp;
use tracing::{info, trace};

pub fn run(args: GrayscaleArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), method = ?args.method, "grayscale::run");

    let op = match args.method {
        GrayMethod::Average => PointOp::GrayscaleAverage,
        GrayMethod::Luminance => PointOp::GrayscaleLuminance(args.luma.weights()),
    };

    let image = super::load_image(&args.input)?;
    info!(op = op.label(), "Converting to gray");
    let gray = super::engine().map(&image, op);
    super::save_image(&args.output, &gray)?;

    if verbose > 0 {
        println!("{} -> {}", op.label(), args.output.display());
    }
    Ok(())
}
