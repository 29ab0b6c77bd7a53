use crate::catalog::list_models;
use crate::config::Config;
use crate::details::fetch_model_spec;
use crate::error::ScrapeError;
use crate::models::ItemSpecTable;
use crate::net::Fetch;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

fn progress_bar(len: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    progress_bar.set_message("Fetching models");
    progress_bar
}

/// Fetches every listed model one after the other and collects the specifications
///
/// The first failing model aborts the whole collection.
///
/// # Arguments
/// * `fetcher` - Transport shared by every request
/// * `config` - Application configuration
/// * `models` - Model references in catalog order
///
/// # Returns
/// Table with one row per distinct reference, in catalog order
pub async fn collect_specs(
    fetcher: &impl Fetch,
    config: &Config,
    models: Vec<String>,
) -> Result<ItemSpecTable, ScrapeError> {
    let progress_bar = progress_bar(models.len());
    let mut table = ItemSpecTable::default();

    for rmc in models {
        let spec = fetch_model_spec(fetcher, config, &rmc).await.inspect_err(|_| {
            progress_bar.abandon_with_message(format!("Failed at {}", rmc));
        })?;
        debug!("{}: {} columns", rmc, spec.len());
        table.insert(rmc, spec);
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("Done fetching");
    info!("Collected {} model specifications", table.len());
    Ok(table)
}

/// Lists the catalog, then collects the specification of every listed model
pub async fn build_table(
    fetcher: &impl Fetch,
    config: &Config,
) -> Result<ItemSpecTable, ScrapeError> {
    let models = list_models(fetcher, config).await?;
    info!("Catalog lists {} models", models.len());
    collect_specs(fetcher, config, models).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::model_url;
    use crate::details::tests::detail_json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use url::Url;

    /// Serves canned bodies keyed by full URL and records every request
    #[derive(Default)]
    struct CannedFetcher {
        bodies: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn with_model(mut self, config: &Config, rmc: &str, body: String) -> Self {
            let url = model_url(config, rmc).unwrap();
            self.bodies.insert(url.to_string(), body);
            self
        }

        fn with_catalog(mut self, config: &Config, body: &str) -> Self {
            let url = crate::catalog::catalog_url(config).unwrap();
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl Fetch for CannedFetcher {
        async fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.bodies
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| ScrapeError::Transport {
                    url: url.to_string(),
                    attempts: 1,
                    reason: "no canned body".to_string(),
                })
        }
    }

    fn models(rmcs: &[&str]) -> Vec<String> {
        rmcs.iter().map(|rmc| rmc.to_string()).collect()
    }

    #[tokio::test]
    async fn one_row_per_model_in_catalog_order() {
        let config = Config::default();
        let fetcher = CannedFetcher::default()
            .with_model(&config, "C", detail_json("Day-Date").to_string())
            .with_model(&config, "A", detail_json("Datejust").to_string())
            .with_model(&config, "B", detail_json("Explorer").to_string());

        let table = collect_specs(&fetcher, &config, models(&["C", "A", "B"]))
            .await
            .unwrap();

        let rows: Vec<_> = table
            .rows()
            .map(|(rmc, spec)| (rmc, spec.get("Name").unwrap()))
            .collect();
        assert_eq!(
            rows,
            vec![("C", "Day-Date"), ("A", "Datejust"), ("B", "Explorer")]
        );
    }

    #[tokio::test]
    async fn duplicate_reference_keeps_a_single_row() {
        let config = Config::default();
        let fetcher = CannedFetcher::default()
            .with_model(&config, "A", detail_json("Datejust").to_string())
            .with_model(&config, "B", detail_json("Explorer").to_string());

        let table = collect_specs(&fetcher, &config, models(&["A", "B", "A"]))
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(fetcher.requested().len(), 3);
    }

    #[tokio::test]
    async fn unknown_model_aborts_the_run() {
        let config = Config::default();
        let fetcher = CannedFetcher::default()
            .with_model(&config, "A", detail_json("Datejust").to_string())
            .with_model(
                &config,
                "B",
                r#"{"error": "no model found with these parameters"}"#.to_string(),
            )
            .with_model(&config, "C", detail_json("Explorer").to_string());

        let err = collect_specs(&fetcher, &config, models(&["A", "B", "C"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::NotFound { ref rmc } if rmc == "B"));
        // Nothing after the failing model is requested
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn transport_failure_aborts_the_run() {
        let config = Config::default();
        let fetcher = CannedFetcher::default()
            .with_model(&config, "A", detail_json("Datejust").to_string());

        let err = collect_specs(&fetcher, &config, models(&["A", "missing"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Transport { .. }));
    }

    #[tokio::test]
    async fn empty_catalog_gives_empty_table() {
        let fetcher = CannedFetcher::default();
        let table = collect_specs(&fetcher, &Config::default(), Vec::new())
            .await
            .unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn catalog_drives_the_detail_requests() {
        let config = Config {
            number_of_results: 2,
            ..Config::default()
        };
        let fetcher = CannedFetcher::default()
            .with_catalog(&config, r#"{"results": [{"rmc": "B"}, {"rmc": "A"}]}"#)
            .with_model(&config, "A", detail_json("Datejust").to_string())
            .with_model(&config, "B", detail_json("Explorer").to_string());

        let table = build_table(&fetcher, &config).await.unwrap();

        assert_eq!(table.rows().map(|(rmc, _)| rmc).collect::<Vec<_>>(), vec!["B", "A"]);
        let requested = fetcher.requested();
        assert_eq!(requested.len(), 3);
        assert!(requested[0].contains("numberOfResults=2"));
    }

    #[tokio::test]
    async fn malformed_catalog_aborts_before_any_detail_request() {
        let config = Config::default();
        let fetcher = CannedFetcher::default().with_catalog(&config, r#"{"grid": []}"#);

        let err = build_table(&fetcher, &config).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Parse { .. }));
        assert_eq!(fetcher.requested().len(), 1);
    }
}
