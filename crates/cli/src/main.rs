//! Papalote Market CLI - fixture checks, pricing and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Check the bundled fixtures for dangling references
//! papalote-cli validate --data-dir crates/storefront/data
//!
//! # Price a piece: 120 MXN of clay, 4 hours at 60 MXN/h, 40% margin
//! papalote-cli price --materials 120 --hours 4 --hourly-rate 60 --margin 40 --state Oaxaca
//!
//! # Toggle maintenance mode on a running storefront
//! papalote-cli maintenance on --url http://localhost:3000 --token "$PAPALOTE_ADMIN_TOKEN"
//! papalote-cli maintenance status
//! ```
//!
//! # Commands
//!
//! - `validate` - Load fixtures and report integrity problems
//! - `price` - Run the fair-trade pricing calculator
//! - `maintenance` - Read or change maintenance mode through the API

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

const DEFAULT_DATA_DIR: &str = "crates/storefront/data";

#[derive(Parser)]
#[command(name = "papalote-cli")]
#[command(author, version, about = "Papalote Market operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check fixture files for dangling references and bad ratings
    Validate {
        /// Directory holding the JSON fixtures
        #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Compute wholesale and retail prices for a piece
    Price(PriceArgs),
    /// Read or change maintenance mode on a running storefront
    Maintenance {
        #[command(subcommand)]
        action: MaintenanceAction,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args)]
struct PriceArgs {
    /// Materials cost (MXN)
    #[arg(long, default_value_t = Decimal::ZERO)]
    materials: Decimal,

    /// Flat labor cost (MXN); ignored when hours and hourly rate are given
    #[arg(long)]
    labor: Option<Decimal>,

    /// Hours of work per piece
    #[arg(long, requires = "hourly_rate")]
    hours: Option<Decimal>,

    /// Hourly rate paid to the maker (MXN)
    #[arg(long, requires = "hours")]
    hourly_rate: Option<Decimal>,

    /// Overhead per piece (MXN)
    #[arg(long, default_value_t = Decimal::ZERO)]
    overhead: Decimal,

    /// Profit margin in percent (0 to 500)
    #[arg(long)]
    margin: Decimal,

    /// Mexican state for the wage check
    #[arg(long)]
    state: Option<String>,

    /// Directory holding `fair_trade_rates.json`
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

#[derive(Args)]
struct ServerArgs {
    /// Storefront base URL
    #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Admin bearer token (required to change the flag)
    #[arg(long, env = "PAPALOTE_ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum MaintenanceAction {
    /// Turn maintenance mode on
    On,
    /// Turn maintenance mode off
    Off,
    /// Show whether maintenance mode is on
    Status,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate { data_dir } => commands::validate::run(&data_dir)?,
        Commands::Price(args) => {
            let request = papalote_core::pricing::PricingRequest {
                materials: args.materials,
                labor: args.labor,
                hours: args.hours,
                hourly_rate: args.hourly_rate,
                overhead: args.overhead,
                profit_margin: args.margin,
                state: args.state,
            };
            commands::price::run(request, &args.data_dir)?;
        }
        Commands::Maintenance { action, server } => {
            let client = commands::maintenance::MaintenanceClient::new(&server.url, server.token);
            match action {
                MaintenanceAction::On => client.set(true).await?,
                MaintenanceAction::Off => client.set(false).await?,
                MaintenanceAction::Status => client.status().await?,
            }
        }
    }
    Ok(())
}
