//! Custom kernel command

use crate::ConvolveArgs;
use anyhow::Result;
use tracing::{info, trace};

pub fn run(args: ConvolveArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), kernel = ?args.kernel, scale = args.scale, "convolve::run");

    let kernel = args.kernel.scaled(args.scale);
    let image = super::load_image(&args.input)?;
    info!(kw = kernel.width(), kh = kernel.height(), sum = kernel.sum(), "Convolving");

    let out = super::engine().convolve(&image, &kernel)?;
    super::save_image(&args.output, &out)?;

    if verbose > 0 {
        println!("{}x{} kernel applied -> {}", kernel.width(), kernel.height(), args.output.display());
    }
    Ok(())
}
