mod api;
mod cli;
mod config;
mod error;
mod metrics;
mod models;
mod providers;
mod repository;
mod sync;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting fourkeys - CI/CD four key metrics service");
    cli.execute().await?;

    Ok(())
}
