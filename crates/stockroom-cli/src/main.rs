mod cart;
mod catalog;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::catalog::CatalogCommands;

#[derive(Debug, Parser)]
#[command(name = "stockroom")]
#[command(about = "Browse a spreadsheet-backed product catalog and keep a local cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and browse the product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Inspect and change the local cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = stockroom_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, command = ?cli.command, "starting");

    match cli.command {
        Commands::Catalog { command } => catalog::run(&config, command).await,
        Commands::Cart { command } => cart::run(&config, command).await,
    }
}
