//! Channel extraction command

use crate::ChannelArgs;
use anyhow::Result;
use px_ops::transform::PointOp;
use tracing::{info, trace};

pub fn run(args: ChannelArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), channel = args.channel.name(), "channel::run");

    let image = super::load_image(&args.input)?;
    info!(channel = args.channel.name(), "Extracting channel");
    let out = super::engine().map(&image, PointOp::from(args.channel));
    super::save_image(&args.output, &out)?;

    if verbose > 0 {
        println!("Wrote {} channel to {}", args.channel.name(), args.output.display());
    }
    Ok(())
}
