//! tgtg - surplus-food marketplace lookups
//!
//! Resolves free-text places into coordinates and lists stores offering
//! surplus food around a point.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tgtg_telemetry::TelemetryConfig;

mod commands;

use commands::{locations, stores};

/// Surplus-food marketplace lookups
#[derive(Parser)]
#[command(name = "tgtg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Account email
    #[arg(long, env = "TGTG_EMAIL", global = true)]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "TGTG_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a place name into coordinates
    Locations {
        /// Free-text place name
        query: String,
    },

    /// List stores with surplus food around a point
    Stores {
        /// Latitude of the search center
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the search center
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in kilometres
        #[arg(short, long, default_value = "5.0")]
        radius: f64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = tgtg_telemetry::init_with_config(&telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = match commands::connect(cli.email, cli.password) {
        Ok(client) => {
            let outcome = match cli.command {
                Commands::Locations { query } => {
                    locations::run(&client, &query, &cli.format).await
                }
                Commands::Stores { lat, lon, radius } => {
                    stores::run(&client, lat, lon, radius, &cli.format).await
                }
            };
            client.close();
            outcome
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
