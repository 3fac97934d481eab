//! px - raster pipeline CLI
//!
//! Runs the derivation pipeline over an image and exports every derived
//! entry, or applies a single operation.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "px")]
#[command(author, version, about = "In-memory RGBA raster pipeline")]
#[command(long_about = "
Loads an image, derives channel extracts, grayscale, blurred and
edge-detected versions from it, and exports them.

Examples:
  px run photo.jpg -o out/                 # Whole pipeline, one PNG per entry
  px run photo.jpg -o out/ --luminance     # Also add a luminance entry
  px channel photo.jpg -o red.png -c red
  px grayscale photo.jpg -o gray.png --method luminance --luma rec601
  px blur photo.jpg -o soft.png --size 5
  px edges photo.jpg -o edges.png --direction vertical
  px convolve photo.jpg -o out.png -k \"0,-1,0;-1,5,-1;0,-1,0\"
  px info photo.jpg
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full derivation pipeline and export every entry
    Run(RunArgs),

    /// Keep a single color channel
    #[command(visible_alias = "ch")]
    Channel(ChannelArgs),

    /// Convert to gray
    #[command(visible_alias = "gray")]
    Grayscale(GrayscaleArgs),

    /// Gaussian blur
    Blur(BlurArgs),

    /// Sobel edge detection on the grayscale average
    Edges(EdgesArgs),

    /// Convolve with a custom kernel
    Convolve(ConvolveArgs),

    /// Show image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Input image
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Pipeline configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Luminance weights (overrides config)
    #[arg(long)]
    luma: Option<px_ops::LumaStandard>,

    /// Add a luminance grayscale entry
    #[arg(long)]
    luminance: bool,

    /// Run single-threaded
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct ChannelArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Channel to keep: red, green or blue
    #[arg(short, long)]
    channel: px_ops::Channel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GrayMethod {
    /// (r + g + b) / 3
    Average,
    /// Weighted sum
    Luminance,
}

#[derive(Args)]
struct GrayscaleArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Conversion method
    #[arg(short, long, value_enum, default_value = "average")]
    method: GrayMethod,

    /// Weights for the luminance method
    #[arg(long, default_value = "rec709")]
    luma: px_ops::LumaStandard,
}

#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel size (odd)
    #[arg(short, long, default_value = "3")]
    size: usize,

    /// Use a sampled Gaussian with this sigma instead of the binomial kernel
    #[arg(long)]
    sigma: Option<f32>,

    /// 3x3 kernel with a 3/16 centre weight (sums to 15/16, darkens)
    #[arg(long, conflicts_with = "sigma")]
    legacy: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Direction {
    /// Responds to vertical edges
    Horizontal,
    /// Responds to horizontal edges
    Vertical,
}

#[derive(Args)]
struct EdgesArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Gradient direction
    #[arg(short, long, value_enum, default_value = "horizontal")]
    direction: Direction,

    /// Kernel scale factor
    #[arg(short, long, default_value_t = px_ops::filter::SOBEL_FACTOR)]
    factor: f32,
}

#[derive(Args)]
struct ConvolveArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel rows separated by ';', weights by ','
    #[arg(short, long, allow_hyphen_values = true)]
    kernel: px_ops::Kernel,

    /// Multiply every weight by this factor
    #[arg(long, default_value = "1.0")]
    scale: f32,
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

/// Installs the stderr subscriber and, with `--log`, a file layer.
///
/// `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8, log: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log {
        Some(path) => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Channel(args) => commands::channel::run(args, cli.verbose),
        Commands::Grayscale(args) => commands::grayscale::run(args, cli.verbose),
        Commands::Blur(args) => commands::blur::run(args, cli.verbose),
        Commands::Edges(args) => commands::edges::run(args, cli.verbose),
        Commands::Convolve(args) => commands::convolve::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convolve_kernel() {
        let cli = Cli::try_parse_from([
            "px", "convolve", "in.png", "-o", "out.png", "-k", "-1,-1,-1;-1,8,-1;-1,-1,-1",
        ])
        .unwrap();
        let Commands::Convolve(args) = cli.command else {
            panic!("expected convolve");
        };
        assert_eq!(args.kernel.width(), 3);
        assert_eq!(args.kernel.weight(1, 1), 8.0);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["px", "-vv", "-j", "4", "info", "a.png"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, 4);
    }

    #[test]
    fn test_blur_size_unchecked_by_parser() {
        // Odd-size validation happens when the kernel is built
        let cli = Cli::try_parse_from(["px", "blur", "a.png", "-o", "b.png", "--size", "4"]).unwrap();
        let Commands::Blur(args) = cli.command else {
            panic!("expected blur");
        };
        assert_eq!(args.size, 4);
    }
}
