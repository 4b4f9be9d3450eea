//! priorgen CLI - shore-proximity prior generation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use priorgen::{
    create_interior_shore_proximity_prior, create_shore_proximity_prior, rasterize_natura_vector,
    DataPaths, PriorgenConfig, RunContext, ShapefileShapes,
};
use priorgen_core::io::{find_metadata, read_geotiff, read_geotiff_metadata};
use priorgen_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "priorgen")]
#[command(author, version, about = "Shore-proximity prior generation for renewable-energy siting", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root of the data tree
    #[arg(short, long, global = true, env = "PRIORGEN_DATA_PATH", default_value = ".")]
    data_path: PathBuf,

    /// JSON configuration overriding the built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterize the Natura2000 protected areas onto a 100 m grid
    Natura,
    /// Offshore prior: distance from the coastline derived from bathymetry
    Shore,
    /// Onshore prior: distance from the sea, inside the country union
    InteriorShore {
        /// Also write an SVG drawing of the sea complement
        #[arg(long)]
        inspect: Option<PathBuf>,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Print the effective configuration as JSON
    Config,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn load_config(path: Option<&Path>) -> Result<PriorgenConfig> {
    match path {
        Some(path) => PriorgenConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PriorgenConfig::default()),
    }
}

fn run_context(paths: &DataPaths, config: &PriorgenConfig) -> RunContext {
    let cache = paths.resolve(&config.shapes.cache_dir);
    RunContext::now(paths.clone(), cache)
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn print_info(input: &Path) -> Result<()> {
    let raster: Raster<f64> = read_geotiff(input, None).context("Failed to read raster")?;
    let metadata = read_geotiff_metadata(input).context("Failed to read metadata")?;
    let (rows, cols) = raster.shape();
    let bounds = raster.bounds();
    let stats = raster.statistics();

    println!("File: {}", input.display());
    println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
    println!("Cell size: {}", raster.cell_size());
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.0, bounds.1, bounds.2, bounds.3
    );
    if let Some(crs) = raster.crs() {
        println!("CRS: {}", crs);
    }
    if let Some(nodata) = raster.nodata() {
        println!("NoData: {}", nodata);
    }

    if find_metadata(&metadata, "GLAES_PRIOR") == Some("YES") {
        let labels: BTreeMap<String, String> = find_metadata(&metadata, "VALUE_MAP")
            .map(serde_json::from_str)
            .transpose()
            .context("Invalid VALUE_MAP")?
            .unwrap_or_default();

        println!("\nClasses:");
        for (value, count) in raster.map(|v| v as u8).value_counts() {
            let label = labels.get(&value.to_string()).map(String::as_str).unwrap_or("?");
            println!("  {:>3} {:<12} {}", value, label, count);
        }
    } else {
        println!("\nStatistics:");
        if let Some(min) = stats.min {
            println!("  Min: {:.4}", min);
        }
        if let Some(max) = stats.max {
            println!("  Max: {:.4}", max);
        }
        if let Some(mean) = stats.mean {
            println!("  Mean: {:.4}", mean);
        }
        println!(
            "  Valid cells: {} ({:.1}%)",
            stats.valid_count,
            100.0 * stats.valid_count as f64 / raster.len() as f64
        );
    }

    if !metadata.is_empty() {
        println!("\nMetadata:");
        for (key, value) in &metadata {
            println!("  {}={}", key, value);
        }
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    let paths = DataPaths::new(&cli.data_path);

    match cli.command {
        Commands::Natura => {
            let start = Instant::now();
            let pb = spinner("Rasterizing Natura2000 areas...")?;
            let output = rasterize_natura_vector(&paths, &config.natura)
                .context("Failed to rasterize Natura2000 areas")?;
            pb.finish_and_clear();
            done("Natura2000 raster", &output, start.elapsed());
        }

        Commands::Shore => {
            let start = Instant::now();
            let ctx = run_context(&paths, &config);
            let source = ShapefileShapes::new(&config.shapes, &paths);
            info!(countries = config.shore.countries.len(), tail = %ctx.tail, "shore proximity");

            let pb = spinner("Computing shore proximity...")?;
            let output = create_shore_proximity_prior(&ctx, &source, &config.shore)
                .context("Failed to create shore proximity prior")?;
            pb.finish_and_clear();
            done("Shore proximity prior", &output, start.elapsed());
        }

        Commands::InteriorShore { inspect } => {
            let start = Instant::now();
            let ctx = run_context(&paths, &config);
            let source = ShapefileShapes::new(&config.shapes, &paths);
            info!(countries = config.interior_shore.countries.len(), tail = %ctx.tail, "interior shore proximity");

            let pb = spinner("Computing interior shore proximity...")?;
            let output = create_interior_shore_proximity_prior(
                &ctx,
                &source,
                &config.interior_shore,
                inspect.as_deref(),
            )
            .context("Failed to create interior shore proximity prior")?;
            pb.finish_and_clear();
            done("Interior shore proximity prior", &output, start.elapsed());
            if let Some(path) = inspect {
                println!("  Complement preview: {}", path.display());
            }
        }

        Commands::Info { input } => print_info(&input)?,

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
