//! agrisure CLI - crop-damage insurance claim assessment

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use agrisure_algorithms::area::acres_to_m2;
use agrisure_algorithms::vegetation::{analyze_damage, damage_mask, excess_green, excess_red};
use agrisure_algorithms::{ClaimAssessor, ClaimRequest};
use agrisure_core::io::{ExifReader, FileImageDecoder};
use agrisure_core::model::Coordinate;
use agrisure_core::source::{ImageDecoder, MetadataExtractor};
use agrisure_core::AssessmentConfig;
use agrisure_weather::{weather_provider, OpenWeatherOptions, API_KEY_ENV};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "agrisure")]
#[command(author, version, about = "Crop-damage insurance claim assessment", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a claim from its field photographs and print the JSON report
    Assess {
        /// Field photographs
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Known field size in m²
        #[arg(long, conflicts_with = "field_acres")]
        field_size: Option<f64>,
        /// Known field size in acres
        #[arg(long)]
        field_acres: Option<f64>,
        /// Sum insured, in policy currency
        #[arg(long, default_value = "100000")]
        sum_insured: f64,
        /// Claimant-reported latitude, used when photos carry no GPS
        #[arg(long, requires = "user_lon", allow_hyphen_values = true)]
        user_lat: Option<f64>,
        /// Claimant-reported longitude
        #[arg(long, requires = "user_lat", allow_hyphen_values = true)]
        user_lon: Option<f64>,
        /// OpenWeatherMap API key
        #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
        api_key: Option<String>,
        /// JSON configuration file (see `agrisure config`)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Ground coverage per image in m² when nothing better is known
        #[arg(long)]
        default_coverage: Option<f64>,
        /// Claim submission time, RFC 3339 (default: now)
        #[arg(long)]
        claim_time: Option<String>,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Show vegetation indices and EXIF metadata of one image
    Inspect {
        /// Input image
        input: PathBuf,
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    Config,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&Path>) -> Result<AssessmentConfig> {
    let Some(path) = path else {
        return Ok(AssessmentConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AssessmentConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

fn parse_claim_time(raw: Option<&str>) -> Result<NaiveDateTime> {
    match raw {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid claim time: {}", s))?
            .naive_local()),
        None => Ok(Local::now().naive_local()),
    }
}

fn field_size_m2(field_size: Option<f64>, field_acres: Option<f64>) -> Result<Option<f64>> {
    let size = field_size.or(field_acres.map(acres_to_m2));
    if let Some(s) = size {
        if !s.is_finite() || s <= 0.0 {
            bail!("Field size must be positive, got {}", s);
        }
    }
    Ok(size)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Assess ───────────────────────────────────────────────────
        Commands::Assess {
            images,
            field_size,
            field_acres,
            sum_insured,
            user_lat,
            user_lon,
            api_key,
            config,
            default_coverage,
            claim_time,
            output,
            pretty,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(coverage) = default_coverage {
                config.area.default_coverage_m2 = coverage;
            }

            let user_coordinate = match (user_lat, user_lon) {
                (Some(lat), Some(lon)) => {
                    Some(Coordinate::new(lat, lon).context("Invalid user coordinate")?)
                }
                _ => None,
            };

            let mut request = ClaimRequest::new(
                images,
                sum_insured,
                parse_claim_time(claim_time.as_deref())?,
            );
            request.field_size_m2 = field_size_m2(field_size, field_acres)?;
            request.user_coordinate = user_coordinate;

            let assessor = ClaimAssessor::new(
                config,
                Box::new(FileImageDecoder),
                Box::new(ExifReader),
            )
            .context("Failed to set up assessment")?
            .with_weather(weather_provider(
                api_key.as_deref(),
                OpenWeatherOptions::default(),
            ));

            let pb = spinner(&format!("Assessing {} images...", request.image_paths.len()));
            let start = Instant::now();
            let result = assessor.assess(&request);
            pb.finish_and_clear();
            let result = result.context("Assessment failed")?;
            info!(
                "{}: {} in {:.2?}",
                result.assessment_id,
                result.decision(),
                start.elapsed()
            );

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Report saved to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        // ── Inspect ──────────────────────────────────────────────────
        Commands::Inspect { input, config } => {
            let config = load_config(config.as_deref())?;
            let params = &config.vegetation;

            let sample = FileImageDecoder
                .decode(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let (rows, cols) = sample.shape();
            let analysis = analyze_damage(&sample, params).context("Failed to analyze image")?;
            let exg = excess_green(&sample, params)?.statistics();
            let exr = excess_red(&sample, params)?.statistics();
            let damaged = damage_mask(&sample, params)?.statistics();
            let meta = ExifReader.extract(&input);

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} pixels)", cols, rows, sample.len());
            println!("\nVegetation:");
            println!(
                "  ExG: mean {:.3}, min {:.3}, max {:.3}",
                exg.mean.unwrap_or(0.0),
                exg.min.unwrap_or(0.0),
                exg.max.unwrap_or(0.0)
            );
            println!(
                "  ExR: mean {:.3}, min {:.3}, max {:.3}",
                exr.mean.unwrap_or(0.0),
                exr.min.unwrap_or(0.0),
                exr.max.unwrap_or(0.0)
            );
            println!(
                "  Damaged pixels: {:.1}%",
                damaged.mean.unwrap_or(0.0) * 100.0
            );
            println!(
                "  Damage: {}% ({} - {})",
                analysis.damage_percentage,
                analysis.damage_type_code,
                analysis.damage_type_code.name()
            );
            println!("\nEXIF:");
            match meta.coordinate {
                Some(c) => println!("  GPS: {:.6}, {:.6}", c.lat, c.lon),
                None => println!("  GPS: -"),
            }
            if let Some(alt) = meta.altitude_m {
                println!("  Altitude: {:.1} m", alt);
            }
            println!("  Captured: {}", meta.timestamp.as_deref().unwrap_or("-"));
            println!("  Software: {}", meta.software.as_deref().unwrap_or("-"));
        }

        // ── Config ───────────────────────────────────────────────────
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&AssessmentConfig::default())?);
        }
    }

    Ok(())
}
