mod colormap;
mod events;
mod export;
mod figure;
mod grid;
mod histogram;
mod mesh;

use anyhow::{Context, Result};
use clap::Parser;
use std::f64::consts::FRAC_PI_2;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "polargram")]
#[command(
    about = "Render a 3D energy-probability distribution from scattering event CSV data",
    long_about = None
)]
struct Args {
    #[arg(value_name = "INPUT", help = "Input CSV file (reads stdin when omitted)")]
    input: Option<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Output PNG file (writes stdout when omitted)")]
    output: Option<PathBuf>,

    #[arg(short = 't', long = "theta-col", default_value = "theta_f", help = "Polar angle column (name or 0-based index)")]
    theta_column: String,

    #[arg(short = 'p', long = "phi-col", default_value = "phi", help = "Azimuthal angle column (name or 0-based index)")]
    phi_column: String,

    #[arg(short = 'e', long = "energy-col", default_value = "ekt", help = "Kinetic energy column (name or 0-based index)")]
    energy_column: String,

    #[arg(long = "units", default_value = "degrees", help = "Angular unit of the input columns (degrees or radians)")]
    units: String,

    #[arg(long = "theta-bins", default_value = "9", help = "Number of polar angle bins")]
    theta_bins: usize,

    #[arg(long = "phi-bins", default_value = "19", help = "Number of azimuthal angle bins")]
    phi_bins: usize,

    #[arg(long = "theta-max", help = "Upper polar angle edge in the selected unit (default: 90 degrees)")]
    theta_max: Option<f64>,

    #[arg(long = "width", default_value = "1024", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "768", help = "Output height in pixels")]
    height: u32,

    #[arg(long = "title", default_value = "3D Energy-Probability Distribution", help = "Figure title")]
    title: String,

    #[arg(long = "energy-label", default_value = "E_f (kcal/mol)", help = "Colorbar label")]
    energy_label: String,

    #[arg(long = "pitch", default_value = "0.6", help = "Camera pitch in radians")]
    pitch: f64,

    #[arg(long = "yaw", default_value = "0.785", help = "Camera yaw in radians")]
    yaw: f64,

    #[arg(long = "zoom", default_value = "0.75", help = "Camera zoom factor")]
    zoom: f64,

    #[arg(long = "export-bins", value_name = "FILE", help = "Also write per-bin statistics as CSV to this file")]
    export_bins: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Print a run summary to stderr")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let unit = events::AngleUnit::parse(&args.units)?;

    let theta_max = match args.theta_max {
        Some(v) => unit.to_radians(v),
        None => FRAC_PI_2,
    };
    let grid = grid::AngularGrid::new(theta_max, args.theta_bins, args.phi_bins)
        .context("Invalid angular grid")?;

    let table = match &args.input {
        Some(path) => events::read_table_from_path(path)
            .with_context(|| format!("Failed to read CSV from '{}'", path.display()))?,
        None => events::read_table_from_stdin().context("Failed to read CSV from stdin")?,
    };

    let columns = events::EventColumns {
        theta: events::parse_column_selector(&args.theta_column),
        phi: events::parse_column_selector(&args.phi_column),
        energy: events::parse_column_selector(&args.energy_column),
    };
    let sample = events::extract_events(&table, &columns, unit)
        .context("Failed to extract event columns")?;

    let dist = histogram::bin_events(&grid, &sample).context("Failed to bin events")?;

    if args.verbose {
        eprintln!(
            "polargram: {} events read, {} in range, {} dropped; grid {} x {} bins",
            sample.len(),
            dist.in_range,
            dist.dropped,
            grid.theta.bins(),
            grid.phi.bins()
        );
    }

    if let Some(path) = &args.export_bins {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?;
        export::write_bins_csv(file, &grid, &dist)
            .context("Failed to export bin statistics")?;
    }

    let faces = mesh::build_bar_mesh(&grid, &dist);

    let config = figure::FigureConfig {
        title: Some(args.title),
        energy_label: args.energy_label,
        width: args.width,
        height: args.height,
        pitch: args.pitch,
        yaw: args.yaw,
        zoom: args.zoom,
    };

    let png_bytes = figure::render_figure(faces, config).context("Failed to render figure")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &png_bytes)
                .with_context(|| format!("Failed to write PNG to '{}'", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&png_bytes)
                .context("Failed to write PNG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
