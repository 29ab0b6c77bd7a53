use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::Catalog;
use crate::net::{Fetch, endpoint};

use log::info;
use url::Url;

/// Builds the listing URL for the configured language and result bound
pub fn catalog_url(config: &Config) -> Result<Url, ScrapeError> {
    let count = config.number_of_results.to_string();
    endpoint(
        &config.catalog_url,
        &[
            ("language", config.language.as_str()),
            ("numberOfResults", count.as_str()),
            ("grid", config.grid.as_str()),
        ],
    )
}

/// Extracts the model references from a listing response, in listing order
pub fn parse_catalog(url: &str, body: &str) -> Result<Vec<String>, ScrapeError> {
    let catalog: Catalog =
        serde_json::from_str(body).map_err(|e| ScrapeError::parse(url, e))?;
    Ok(catalog.results.into_iter().map(|entry| entry.rmc).collect())
}

/// Fetches the catalog once and returns every model reference it lists
pub async fn list_models(fetcher: &impl Fetch, config: &Config) -> Result<Vec<String>, ScrapeError> {
    let url = catalog_url(config)?;
    info!("Fetching catalog: {}", url);
    let body = fetcher.get_text(&url).await?;
    parse_catalog(url.as_str(), &body)
}
