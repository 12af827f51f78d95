//! Car Price Predictor CLI
//!
//! A command-line tool for estimating used-car prices, browsing the
//! categories the model knows about, and inspecting model artifacts.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, model, predict};
use pricing_lib::models::PredictionRequest;
use std::path::PathBuf;

/// Car Price Predictor CLI
#[derive(Parser)]
#[command(name = "carprice")]
#[command(author, version, about = "CLI for the Car Price Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via CARPRICE_API_URL env var)
    #[arg(long, env = "CARPRICE_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate the selling price of a car
    Predict(CarArgs),

    /// List the known brands, fuels, seller types and transmissions
    Classes,

    /// Show how much each feature contributes to the model
    Importances,

    /// Show metadata for the model the server has loaded
    Model,

    /// Validate a model artifact on disk and print its metadata
    Inspect {
        /// Path to the JSON model artifact
        path: PathBuf,
    },
}

#[derive(clap::Args, Clone)]
pub struct CarArgs {
    /// Car brand, e.g. Maruti
    #[arg(long)]
    pub brand: String,

    /// Year of purchase
    #[arg(long)]
    pub year: i64,

    /// Kilometers driven
    #[arg(long)]
    pub km_driven: i64,

    /// Fuel type, e.g. Diesel
    #[arg(long)]
    pub fuel: String,

    /// Seller type, e.g. Dealer
    #[arg(long)]
    pub seller_type: String,

    /// Transmission, e.g. Manual
    #[arg(long)]
    pub transmission: String,

    /// Number of previous owners
    #[arg(long, default_value_t = 0)]
    pub owner: i64,

    /// Mileage in km/l
    #[arg(long)]
    pub mileage: f64,

    /// Engine displacement in CC
    #[arg(long)]
    pub engine: f64,

    /// Max power in bhp
    #[arg(long)]
    pub max_power: f64,

    /// Number of seats
    #[arg(long, default_value_t = 5)]
    pub seats: i64,
}

impl From<CarArgs> for PredictionRequest {
    fn from(args: CarArgs) -> Self {
        PredictionRequest {
            brand: args.brand,
            year: args.year,
            km_driven: args.km_driven,
            fuel: args.fuel,
            seller_type: args.seller_type,
            transmission: args.transmission,
            owner: args.owner,
            mileage: args.mileage,
            engine: args.engine,
            max_power: args.max_power,
            seats: args.seats,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(err) = run(cli).await {
        if verbose {
            output::print_error(&format!("{:?}", err));
        } else {
            output::print_error(&format!("{:#}", err));
        }
        if let Some(api_err) = err.downcast_ref::<client::ApiError>() {
            for violation in &api_err.violations {
                eprintln!("  {}: {}", violation.field, violation.message);
            }
        }
        std::process::exit(1);
    }
}

fn connect(cli: &Cli) -> Result<client::ApiClient> {
    if cli.verbose {
        output::print_info(&format!("Using API at {}", cli.api_url));
    }
    client::ApiClient::new(&cli.api_url)
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Predict(args) => {
            let client = connect(&cli)?;
            predict::predict(&client, args.clone().into(), cli.format).await?;
        }
        Commands::Classes => {
            model::show_classes(&connect(&cli)?, cli.format).await?;
        }
        Commands::Importances => {
            model::show_importances(&connect(&cli)?, cli.format).await?;
        }
        Commands::Model => {
            model::show_model(&connect(&cli)?, cli.format).await?;
        }
        // Inspection works offline
        Commands::Inspect { path } => {
            inspect::inspect(path, cli.format)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_args_map_to_request() {
        let cli = Cli::try_parse_from([
            "carprice", "predict", "--brand", "Maruti", "--year", "2020", "--km-driven", "40000",
            "--fuel", "Diesel", "--seller-type", "Dealer", "--transmission", "Manual", "--owner",
            "1", "--mileage", "18", "--engine", "1200", "--max-power", "90",
        ])
        .unwrap();

        let Commands::Predict(args) = cli.command else {
            panic!("expected predict command");
        };
        let request = PredictionRequest::from(args);
        assert_eq!(request.brand, "Maruti");
        assert_eq!(request.km_driven, 40_000);
        assert_eq!(request.seats, 5);
        assert_eq!(request.max_power, 90.0);
    }

    #[test]
    fn test_predict_requires_brand() {
        let result = Cli::try_parse_from(["carprice", "predict", "--year", "2020"]);
        assert!(result.is_err());
    }
}
