use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::{ItemSpec, LightboxImage, ModelDetail};
use crate::net::{Fetch, endpoint};

use log::debug;
use serde_json::Value;
use url::Url;

/// Body of the `error` field when the API does not know a reference
const NOT_FOUND_SENTINEL: &str = "no model found with these parameters";

/// Builds the detail URL for one model reference
pub fn model_url(config: &Config, rmc: &str) -> Result<Url, ScrapeError> {
    let base = format!("{}/{}", config.model_url.trim_end_matches('/'), rmc);
    endpoint(&base, &[("language", config.language.as_str())])
}

/// Turns a detail response into the flattened specification of `rmc`
///
/// # Arguments
/// * `rmc` - Model reference the response was requested for
/// * `url` - Request URL, used in error messages
/// * `body` - Raw response body
/// * `config` - Supplies the media base URL and the "Material" column naming
///
/// # Returns
/// * `ItemSpec` with one column per label, plus the derived image and user guide URLs
pub fn parse_model_spec(
    rmc: &str,
    url: &str,
    body: &str,
    config: &Config,
) -> Result<ItemSpec, ScrapeError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ScrapeError::parse(url, e))?;

    if value.get("error").and_then(Value::as_str) == Some(NOT_FOUND_SENTINEL) {
        return Err(ScrapeError::NotFound {
            rmc: rmc.to_string(),
        });
    }

    let detail: ModelDetail =
        serde_json::from_value(value).map_err(|e| ScrapeError::parse(url, e))?;

    // The lightbox field holds a JSON array serialized as a string
    let images: Vec<LightboxImage> =
        serde_json::from_str(&detail.editorial_mapping.cover.lightbox_image_landscape_cl)
            .map_err(|e| ScrapeError::parse(url, e))?;
    let image = images.into_iter().next().ok_or_else(|| {
        ScrapeError::parse(
            url,
            serde::de::Error::custom("lightbox_image_landscape_cl holds no image"),
        )
    })?;

    let media = config.media_base_url.trim_end_matches('/');
    let (case_material, bracelet_material) = if config.disambiguate_material {
        ("Case material", "Bracelet material")
    } else {
        ("Material", "Material")
    };

    let case = detail.case.labels;
    let movement = detail.movement.labels;
    let bracelet = detail.bracelet.labels;
    let dial = detail.dial.labels;

    let mut spec = ItemSpec::default();
    spec.insert("Name", detail.name);
    spec.insert("Img (URL)", format!("{}/image/upload/{}", media, image.src));

    spec.insert("Model case", case.title);
    spec.insert("Bezel", case.bezel);
    spec.insert("Oyster architecture", case.oyster_architecture);
    spec.insert("Diameter", case.diameter);
    spec.insert(case_material, case.material);
    spec.insert("Winding crown", case.winding_crown);
    spec.insert("Crystal", case.crystal);
    spec.insert("Water resistance", case.water_resistance);

    spec.insert("Movement", movement.title);
    spec.insert("Calibre", movement.calibre);
    spec.insert("Precision", movement.precision_static);
    spec.insert("Functions", movement.functions);
    spec.insert("Oscillator", movement.oscillator);
    spec.insert("Winding", movement.winding);
    spec.insert("Power reserve", movement.tdr_movement_autonomy);

    spec.insert("Bracelet", bracelet.title);
    // Without disambiguation this overwrites the case material
    spec.insert(bracelet_material, bracelet.material);
    spec.insert("Clasp", bracelet.clasp_type);

    spec.insert("Dial", dial.title);
    spec.insert("Details", dial.details);

    spec.insert("Certification", movement.certification);
    spec.insert(
        "User guide",
        format!("{}/{}", media, detail.editorial_mapping.userguide.path_cl),
    );

    Ok(spec)
}

/// Fetches and flattens the specification of one model
pub async fn fetch_model_spec(
    fetcher: &impl Fetch,
    config: &Config,
    rmc: &str,
) -> Result<ItemSpec, ScrapeError> {
    let url = model_url(config, rmc)?;
    debug!("Fetching model {}: {}", rmc, url);
    let body = fetcher.get_text(&url).await?;
    parse_model_spec(rmc, url.as_str(), &body, config)
}
