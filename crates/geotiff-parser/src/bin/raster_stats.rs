//! Print the georeferencing and value statistics of a GeoTIFF.
//!
//! Usage:
//!   raster-stats scene.tif --threshold 40

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use geotiff_parser::{read_raster, RasterStats};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "raster-stats")]
#[command(about = "Inspect a GeoTIFF before running it through the flood pipeline")]
struct Args {
    /// GeoTIFF to inspect
    input: PathBuf,

    /// Report how many samples fall in (0, threshold)
    #[arg(short, long, default_value_t = 40.0)]
    threshold: f32,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).compact().with_target(false).init();

    let grid = read_raster(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let extent = grid.extent();
    let (px, py) = grid.transform.pixel_size();

    println!("File:       {}", args.input.display());
    println!("Size:       {} x {}", grid.width, grid.height);
    println!("CRS:        {}", grid.crs);
    println!("Pixel size: {} x {}", px, py);
    println!(
        "Extent:     [{}, {}] - [{}, {}]",
        extent.min_x, extent.min_y, extent.max_x, extent.max_y
    );

    match RasterStats::compute(&grid.data) {
        Some(stats) => {
            let below = RasterStats::count_below(&grid.data, args.threshold);
            println!("Min / max:  {} / {}", stats.min, stats.max);
            println!("Mean:       {:.4}", stats.mean);
            println!("Valid:      {} of {}", stats.valid_count, stats.total_count);
            println!("Zero:       {}", stats.zero_count);
            println!(
                "(0, {}):    {} ({:.2}%)",
                args.threshold,
                below,
                100.0 * below as f64 / stats.total_count as f64
            );
            println!();
            println!("Hint: water is 0 < v < threshold; pick a threshold just above the dark water returns.");
        }
        None => println!("No finite samples"),
    }

    Ok(())
}
