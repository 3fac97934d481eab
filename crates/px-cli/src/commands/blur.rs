//! Blur command
//!
//! Binomial Gaussian blur (3x3 or 5x5), or a sampled Gaussian when a sigma
//! is given. `--legacy` selects the 3x3 variant with a 3/16 centre.

use crate::BlurArgs;
use anyhow::{Result, bail};
use px_ops::Kernel;
use tracing::{info, trace};

fn kernel_for(size: usize, sigma: Option<f32>, legacy: bool) -> Result<Kernel> {
    if legacy {
        if size != 3 || sigma.is_some() {
            bail!("--legacy is a fixed 3x3 kernel");
        }
        return Ok(Kernel::gaussian_3x3_legacy());
    }
    Ok(match (size, sigma) {
        (_, Some(sigma)) => Kernel::gaussian(size, sigma)?,
        (3, None) => Kernel::gaussian_3x3(),
        (5, None) => Kernel::gaussian_5x5(),
        (n, None) => bail!("No fixed kernel of size {n}; pass --sigma for other sizes"),
    })
}

pub fn run(args: BlurArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), size = args.size, sigma = ?args.sigma, "blur::run");

    let kernel = kernel_for(args.size, args.sigma, args.legacy)?;
    let image = super::load_image(&args.input)?;
    info!(size = args.size, w = image.width(), h = image.height(), "Applying blur");

    if verbose > 0 {
        println!("Applying {0}x{0} blur to {1}", args.size, args.input.display());
    }

    let blurred = super::engine().convolve(&image, &kernel)?;
    super::save_image(&args.output, &blurred)?;

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}
