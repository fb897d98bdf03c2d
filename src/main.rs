//! # Planar Slicer CLI
//!
//! Command-line front end for the slicing library: converts an ASCII STL
//! model into a timed print-head path (`path.csv`) under a build-volume and
//! slice-settings configuration.
//!
//! ## Usage
//!
//! ```bash
//! planar-slicer slice model.stl --output outputs/ --config printer.toml
//! planar-slicer validate model.stl
//! planar-slicer init printer.toml
//! ```
//!
//! The pipeline is synchronous: per-slice parallelism, when enabled, is
//! handled internally via rayon rather than an async runtime, since there is
//! no I/O-bound waiting between slices.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use planar_slicer::config::ConfigLoader;
use planar_slicer::core::orient::Axis;
use planar_slicer::{PrinterSettings, SliceResult, Slicer, SlicerConfig};

/// Planar Slicer - STL mesh slicing, contour reconstruction, and infill path generation
#[derive(Parser, Debug)]
#[command(name = "planar-slicer")]
#[command(version)]
#[command(about = "Slices an ASCII STL model into a timed print-head path", long_about = None)]
struct Cli {
    /// Verbose logging level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Slice an STL model and write path.csv (plus optional SVG previews)
    Slice {
        /// Input ASCII STL file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory for path.csv and any SVG previews
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Printer/slice settings TOML file
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of worker threads for per-slice parallelism (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Disable per-slice parallelism
        #[arg(long)]
        sequential: bool,

        /// Write a per-layer SVG preview alongside path.csv
        #[arg(long)]
        svg: bool,

        /// Rotate the model about X by a multiple of 90 degrees before slicing
        #[arg(long, value_name = "QUARTER_TURNS")]
        rotate_x: Option<i32>,

        /// Rotate the model about Y by a multiple of 90 degrees before slicing
        #[arg(long, value_name = "QUARTER_TURNS")]
        rotate_y: Option<i32>,

        /// Rotate the model about Z by a multiple of 90 degrees before slicing
        #[arg(long, value_name = "QUARTER_TURNS")]
        rotate_z: Option<i32>,
    },

    /// Validate that an STL model loads and contains a usable mesh
    Validate {
        /// Input ASCII STL file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write a default printer/slice settings TOML file
    Init {
        /// Output settings file path
        #[arg(value_name = "FILE", default_value = "printer.toml")]
        output: PathBuf,
    },
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "planar_slicer=info",
        1 => "planar_slicer=debug",
        _ => "planar_slicer=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).try_init().ok();
    Ok(())
}

fn load_settings(config: Option<PathBuf>) -> Result<PrinterSettings> {
    match config {
        Some(path) => ConfigLoader::load(&path).context("loading printer/slice settings"),
        None => Ok(PrinterSettings::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_slice(
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    threads: Option<usize>,
    sequential: bool,
    svg: bool,
    rotate_x: Option<i32>,
    rotate_y: Option<i32>,
    rotate_z: Option<i32>,
) -> Result<SliceResult> {
    let settings = load_settings(config)?;

    let mut slicer_config = SlicerConfig::default();
    if let Some(n) = threads {
        slicer_config.worker_threads = n;
    }
    slicer_config.parallel_slicing = !sequential;
    slicer_config.write_svg = svg;

    slicer_config.rotation = match (rotate_x, rotate_y, rotate_z) {
        (Some(q), None, None) => Some((Axis::X, q)),
        (None, Some(q), None) => Some((Axis::Y, q)),
        (None, None, Some(q)) => Some((Axis::Z, q)),
        (None, None, None) => None,
        _ => anyhow::bail!("only one of --rotate-x, --rotate-y, --rotate-z may be given"),
    };

    let slicer = Slicer::with_config(settings, slicer_config);
    slicer.slice_file(&input, &output)
}

fn run_validate(input: PathBuf) -> Result<()> {
    let loader = planar_slicer::core::mesh_loader::StlLoader::new();
    let mesh = planar_slicer::ModelLoader::load(&loader, &input)?;
    let stats = planar_slicer::core::mesh_loader::compute_mesh_stats(&mesh);
    planar_slicer::core::mesh_loader::validate_mesh(&mesh)?;
    println!(
        "{}: {} triangles, {} degenerate, surface area {:.4}",
        input.display(),
        stats.triangle_count,
        stats.degenerate_count,
        stats.surface_area
    );
    Ok(())
}

fn run_init(output: PathBuf) -> Result<()> {
    ConfigLoader::write_default(&output).with_context(|| format!("writing {}", output.display()))?;
    println!("wrote default settings to {}", output.display());
    Ok(())
}

fn print_slice_results(result: &SliceResult) {
    println!("layers:         {}", result.layer_count);
    println!("estimated time: {:.2}s", result.estimated_time.as_secs_f64());
    println!("elapsed time:   {:.2}s", result.elapsed_time.as_secs_f64());
    println!("output:         {}", result.output_path.display());
    if !result.warnings.is_empty() {
        println!("warnings:");
        for w in &result.warnings {
            println!("  - {w}");
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    info!("planar-slicer v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Slice { input, output, config, threads, sequential, svg, rotate_x, rotate_y, rotate_z } => {
            run_slice(input, output, config, threads, sequential, svg, rotate_x, rotate_y, rotate_z)
                .map(|r| print_slice_results(&r))
        }
        Commands::Validate { input } => run_validate(input),
        Commands::Init { output } => run_init(output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_subcommand_parses_input_and_output() {
        let cli = Cli::parse_from(["planar-slicer", "slice", "model.stl", "--output", "out"]);
        match cli.command {
            Commands::Slice { input, output, .. } => {
                assert_eq!(input, PathBuf::from("model.stl"));
                assert_eq!(output, PathBuf::from("out"));
            }
            _ => panic!("expected Slice subcommand"),
        }
    }

    #[test]
    fn validate_subcommand_parses() {
        let cli = Cli::parse_from(["planar-slicer", "validate", "model.stl"]);
        assert!(matches!(cli.command, Commands::Validate { .. }));
    }

    #[test]
    fn init_subcommand_defaults_output_path() {
        let cli = Cli::parse_from(["planar-slicer", "init"]);
        match cli.command {
            Commands::Init { output } => assert_eq!(output, PathBuf::from("printer.toml")),
            _ => panic!("expected Init subcommand"),
        }
    }
}
