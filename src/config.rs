use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Excel caps sheet names at 31 characters
const MAX_SHEET_NAME_LEN: usize = 31;

/// Command-line arguments for the catalog exporter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file in YAML format
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
    /// Number of catalog entries to request, overrides the config value
    #[arg(short = 'n', long)]
    pub count: Option<u32>,
    /// Output file path, overrides the config value
    #[arg(short, long)]
    pub output: Option<String>,
    /// Output format, overrides the config value
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Spreadsheet format written at the end of a run
#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

/// Application configuration structure
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Listing endpoint returning the whole watch grid
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// Detail endpoint; the model reference is appended as a path segment
    #[serde(default = "default_model_url")]
    pub model_url: String,
    /// Base URL for images and user guides
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
    /// Value of the `language` query parameter
    #[serde(default = "default_language")]
    pub language: String,
    /// Value of the `grid` query parameter on the listing endpoint
    #[serde(default = "default_grid")]
    pub grid: String,
    /// Upper bound on the number of catalog entries requested
    #[serde(default = "default_number_of_results")]
    pub number_of_results: u32,
    /// Path of the exported spreadsheet
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Name of the single sheet written to xlsx output
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Spreadsheet format of the export
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
    /// Retries per request before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay of the exponential backoff, in milliseconds
    #[serde(default)]
    pub backoff_factor_ms: u64,
    /// Ceiling on a single backoff delay, in milliseconds
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    /// Split the shared "Material" column into case and bracelet columns
    #[serde(default)]
    pub disambiguate_material: bool,
}

fn default_catalog_url() -> String {
    "https://www.rolex.com/api/catalog/watchgrid".to_string()
}
fn default_model_url() -> String {
    "https://www.rolex.com/api/catalog/watches".to_string()
}
fn default_media_base_url() -> String {
    "https://media.rolex.com".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_grid() -> String {
    "all".to_string()
}
fn default_number_of_results() -> u32 {
    1500
}
fn default_output_path() -> String {
    "Rolex_DataSheet.xlsx".to_string()
}
fn default_sheet_name() -> String {
    "MainPage".to_string()
}
fn default_output_format() -> OutputFormat {
    OutputFormat::Xlsx
}
fn default_max_retries() -> u32 {
    20
}
fn default_backoff_max_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            model_url: default_model_url(),
            media_base_url: default_media_base_url(),
            language: default_language(),
            grid: default_grid(),
            number_of_results: default_number_of_results(),
            output_path: default_output_path(),
            sheet_name: default_sheet_name(),
            output_format: default_output_format(),
            max_retries: default_max_retries(),
            backoff_factor_ms: 0,
            backoff_max_ms: default_backoff_max_ms(),
            disambiguate_material: false,
        }
    }
}

impl Config {
    /// Loads the YAML config named by `args` and applies the command-line overrides
    ///
    /// A missing file at the default path falls back to built-in defaults,
    /// a missing file given explicitly is an error.
    pub fn load(args: &Args) -> Result<Self> {
        let path = Path::new(&args.config);
        let mut config = if !path.exists() && args.config == DEFAULT_CONFIG_PATH {
            log::info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Config::default()
        } else {
            let config_file = File::open(path).context("Failed to open config file")?;
            let reader = BufReader::new(config_file);
            serde_yaml::from_reader(reader).context("Failed to parse config YAML")?
        };

        if let Some(count) = args.count {
            config.number_of_results = count;
        }
        if let Some(output) = &args.output {
            config.output_path = output.clone();
        }
        if let Some(format) = args.format {
            config.output_format = format;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.number_of_results == 0 {
            bail!("number_of_results must be greater than zero");
        }
        if self.sheet_name.is_empty() || self.sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
            bail!(
                "sheet_name must be between 1 and {} characters: {:?}",
                MAX_SHEET_NAME_LEN,
                self.sheet_name
            );
        }
        // Same rules the workbook applies when saving
        rust_xlsxwriter::Worksheet::new()
            .set_name(&self.sheet_name)
            .with_context(|| format!("Invalid sheet_name {:?}", self.sheet_name))?;
        Ok(())
    }

    pub fn backoff_factor(&self) -> Duration {
        Duration::from_millis(self.backoff_factor_ms)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}
