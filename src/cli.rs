//! CLI helper functions

use crate::{
    config::{Resource, SourceConfig},
    etl::Pipeline,
    source::OcrSource,
    storage::NdjsonWriter,
};
use eyre::{Result, WrapErr};
use std::path::Path;

/// Load the source configuration from a YAML file and the environment
///
/// Environment variables override the file:
/// - OCR_API_KEY: API key sent as `X-API-KEY`
/// - OCR_CLIENT_UUID: Client identifier substituted into resource paths
/// - OCR_WEEKS_BACK: Number of weeks of data to request
pub fn load_source_config(path: impl AsRef<Path>) -> Result<SourceConfig> {
    let path = path.as_ref();
    log::debug!("Loading source config from {}", path.display());
    let mut config = SourceConfig::read(path)?;

    if let Ok(api_key) = std::env::var("OCR_API_KEY") {
        config.api_key = api_key;
    }
    if let Ok(client_uuid) = std::env::var("OCR_CLIENT_UUID") {
        config.client_uuid = client_uuid;
    }
    if let Ok(weeks) = std::env::var("OCR_WEEKS_BACK") {
        config.weeks = weeks
            .parse()
            .wrap_err_with(|| format!("Invalid OCR_WEEKS_BACK: {}", weeks))?;
    }

    if config.api_key.is_empty() {
        log::warn!("No API key configured, requests will likely be rejected");
    }

    Ok(config)
}

/// Pull every configured report into an NDJSON file
///
/// Pipeline: OcrSource → NdjsonWriter
pub async fn pull_reports(
    config_path: impl AsRef<Path>,
    output: impl AsRef<Path>,
    batch_size: Option<usize>,
) -> Result<usize> {
    let mut config = load_source_config(config_path)?;
    if let Some(batch_size) = batch_size {
        config.batch_size = batch_size;
    }

    let source = OcrSource::try_new(config).wrap_err("Failed to create report source")?;
    log::info!(
        "Pulling {} resource(s) for destination '{}' (id pattern {})",
        source.total(),
        source.config().destination(),
        source.config().idpattern()
    );

    let writer = NdjsonWriter::create(output)?;
    let mut pipeline = Pipeline::new(source, writer);
    pipeline.run().await
}

/// List configured resources in the order they will be processed
pub fn list_resources(config_path: impl AsRef<Path>) -> Result<Vec<Resource>> {
    let config = load_source_config(config_path)?;
    config.validate()?;

    Ok(config.resources.into_iter().rev().collect())
}
