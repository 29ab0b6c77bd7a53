//! A CLI tool that exports the Rolex watch catalog to a spreadsheet.
//!
//! It reads an optional yaml configuration file, lists every model reference
//! from the catalog API, then fetches each model's specification one request
//! at a time and flattens it into a row. The rows are written to a single
//! xlsx sheet (or a csv file) once every model has been fetched.
//! Any failure aborts the run before anything is written.

mod catalog;
mod config;
mod details;
mod error;
mod export;
mod models;
mod net;
mod pipeline;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, Config};
use log::info;
use net::{HttpFetcher, RetryPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(&args)?;

    let fetcher =
        HttpFetcher::new(RetryPolicy::from_config(&config)).context("Failed to build HTTP client")?;

    let table = pipeline::build_table(&fetcher, &config)
        .await
        .context("Failed to collect catalog specifications")?;

    info!("Exporting {} models to {}", table.len(), config.output_path);
    export::export(&table, &config).context("Failed to export specifications")?;

    Ok(())
}
