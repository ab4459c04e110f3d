//! BikeLocator CLI
//!
//! Finds nearby PubliBike and Velospot stations and shows them as one list.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use std::path::PathBuf;

use anyhow::Context;
use application::PipelineEvent;
use clap::{Parser, Subcommand};
use domain::Coordinate;
use infrastructure::{AppConfig, build_locator_service, init_logging};
use tokio::sync::mpsc;
use tracing::debug;

/// BikeLocator CLI
#[derive(Debug, Parser)]
#[command(name = "bikelocator")]
#[command(author, version, about = "Nearby shared bikes from PubliBike and Velospot", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./bikelocator.toml if present)
    #[arg(short, long, env = "BIKELOCATOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stations near a position
    ///
    /// Example: bikelocator nearby --lat 47.3875 --lon 8.5271 --details
    Nearby {
        /// Latitude in degrees (default: [location] in the config)
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees (default: [location] in the config)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Search radius in meters
        #[arg(long)]
        max_distance: Option<f64>,

        /// Stations considered per operator
        #[arg(long)]
        max_stations: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Show each ebike's charge and a maps link per station
        #[arg(long)]
        details: bool,
    },

    /// Estimate the charge of a Velospot battery from its voltage
    Battery {
        /// Pack voltage in volts
        voltage: f64,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse `--lat`/`--lon` into a position
fn position_from_args(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<Option<Coordinate>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(
            Coordinate::new(lat, lon).context("invalid --lat/--lon")?,
        )),
        _ => Ok(None),
    }
}

/// Apply command-line limits on top of the loaded configuration
fn apply_limits(
    config: &mut AppConfig,
    max_distance: Option<f64>,
    max_stations: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(meters) = max_distance {
        config.locator.ranking.max_distance_meters = meters;
    }
    if let Some(count) = max_stations {
        config.locator.ranking.max_stations = count;
    }
    config.validate().context("invalid search limits")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(log_filter_from_verbosity(cli.verbose), &config.logging)?;
    debug!(?cli, "Starting");

    match cli.command {
        Commands::Nearby {
            lat,
            lon,
            max_distance,
            max_stations,
            json,
            details,
        } => {
            let position = position_from_args(lat, lon)?;
            apply_limits(&mut config, max_distance, max_stations)?;
            let service = build_locator_service(&config, position)?;

            let result = if json {
                service.locate().await?
            } else {
                let (tx, mut rx) = mpsc::unbounded_channel::<PipelineEvent>();
                let printer = tokio::spawn(async move {
                    while let Some(event) = rx.recv().await {
                        eprintln!("{}", render::progress_line(&event));
                    }
                });
                let result = service.locate_with_progress(Some(&tx)).await;
                drop(tx);
                printer.await?;
                result?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!(
                    "{}",
                    render::station_table(&result, config.display.max_shown_ebikes, details)
                );
            }
        },

        Commands::Battery { voltage } => {
            let level = config.velospot.battery.estimate(Some(voltage));
            println!("{voltage} V ≈ {level}");
        },

        Commands::Config => {
            print!("{}", config.to_toml()?);
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn parses_nearby_arguments() {
        let cli = Cli::try_parse_from([
            "bikelocator",
            "-vv",
            "nearby",
            "--lat",
            "47.3875",
            "--lon",
            "-8.5",
            "--max-stations",
            "5",
            "--details",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Nearby {
                lat,
                lon,
                max_stations,
                details,
                json,
                ..
            } => {
                assert_eq!(lat, Some(47.3875));
                assert_eq!(lon, Some(-8.5));
                assert_eq!(max_stations, Some(5));
                assert!(details);
                assert!(!json);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        let result = Cli::try_parse_from(["bikelocator", "nearby", "--lat", "47.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn position_from_args_validates_range() {
        assert!(position_from_args(None, None).unwrap().is_none());
        assert!(position_from_args(Some(47.0), Some(8.0)).unwrap().is_some());
        assert!(position_from_args(Some(95.0), Some(8.0)).is_err());
    }

    #[test]
    fn apply_limits_overrides_and_validates() {
        let mut config = AppConfig::default();
        apply_limits(&mut config, Some(250.0), Some(3)).unwrap();
        assert!((config.locator.ranking.max_distance_meters - 250.0).abs() < f64::EPSILON);
        assert_eq!(config.locator.ranking.max_stations, 3);

        let mut config = AppConfig::default();
        assert!(apply_limits(&mut config, None, Some(0)).is_err());
    }
}
