use thiserror::Error;

/// Failures raised while talking to the catalog API.
///
/// Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The detail endpoint answered with its "no model found" sentinel
    #[error("Specified model ({rmc}) not found")]
    NotFound { rmc: String },

    /// Body was not JSON, or did not have the expected shape
    #[error("Unexpected response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request still failing after every retry
    #[error("Request to {url} failed after {attempts} attempt(s): {reason}")]
    Transport {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// A configured base URL could not be parsed
    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ScrapeError {
    pub(crate) fn parse(url: &str, source: serde_json::Error) -> Self {
        Self::Parse {
            url: url.to_string(),
            source,
        }
    }
}
