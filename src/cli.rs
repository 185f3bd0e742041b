use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gpx2svg::output::{default_output_path, profile_path, write_profile, write_svg};
use gpx2svg::{Canvas, Gpx2SvgError, convert};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GPX file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output SVG file (default: INPUT with an .svg extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Canvas width
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Blank border kept on every side of the canvas
    #[arg(long, default_value_t = 20.0)]
    margin: f64,

    /// Do not write the OUTPUT.profile.json side file
    #[arg(long)]
    no_profile: bool,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.input.is_file() {
        anyhow::bail!("input file does not exist: {}", args.input.display());
    }

    let canvas = Canvas::new(args.width, args.height, args.margin);
    canvas.validate()?;

    info!("Processing GPX file: {:?}", args.input);
    let xml = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let conversion = match convert(&xml, &canvas) {
        Ok(conversion) => conversion,
        Err(Gpx2SvgError::NoPoints) => {
            anyhow::bail!("no GPS points found in {}", args.input.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to convert {}", args.input.display()));
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    write_svg(&output, &conversion.svg)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("Written SVG: {:?}", output);
    info!(
        "Points: {} (from {} points)",
        conversion.point_count, conversion.source
    );

    if !args.no_profile {
        let profile_output = profile_path(&output);
        // the side file is diagnostic only
        match write_profile(&profile_output, &conversion.profile) {
            Ok(()) => info!("Written profile: {:?}", profile_output),
            Err(e) => warn!("Could not write profile {:?}: {}", profile_output, e),
        }
    }

    Ok(())
}
