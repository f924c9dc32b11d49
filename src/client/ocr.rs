//! One Click Retail API client
//!
//! Provides `OcrClient`, the [`Fetcher`] that turns a report resource into a
//! lazy row sequence:
//! `GET {base}/{resource path}?meta=false&X-API-KEY={key}&weeks_back={weeks}`

use crate::config::{Resource, SourceConfig};
use crate::decode::CsvRows;
use crate::error::{Result, SourceError};
use crate::etl::Fetcher;
use crate::storage::{LossyUtf8Writer, SpooledBuffer};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::io::Write;
use std::time::Instant;
use url::Url;

const FETCH_META: bool = false;

/// Client for the One Click Retail reporting API.
///
/// Each fetch is a single request with no retry. The whole response body is
/// copied into a [`SpooledBuffer`], so large reports end up on disk instead
/// of in memory, and rows are decoded from there as they are pulled.
///
/// # Example
/// ```no_run
/// use ocr_connector::client::OcrClient;
/// use ocr_connector::etl::Fetcher;
/// use ocr_connector::{Resource, SourceConfig};
///
/// # async fn example() -> ocr_connector::Result<()> {
/// let resource = Resource::new("reports csv", "v5/clients/%s/reports/export");
/// let config = SourceConfig::new("client-uuid", "api-key", vec![resource.clone()]);
/// let client = OcrClient::try_new(&config)?;
///
/// for row in client.fetch(&resource).await? {
///     println!("{:?}", row?.get("week_asin"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OcrClient {
    client: Client,
    base_url: Url,
    client_uuid: String,
    api_key: String,
    weeks: u32,
    max_spool_size: usize,
}

impl OcrClient {
    /// Create a client from the source configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The base URL cannot be parsed
    /// - The HTTP client cannot be built
    pub fn try_new(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SourceError::config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;
        let client = Client::builder()
            .user_agent(concat!("ocr-connector/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            client_uuid: config.client_uuid.clone(),
            api_key: config.api_key.clone(),
            weeks: config.weeks,
            max_spool_size: config.max_spool_size,
        })
    }

    /// Build the full request URL for a resource, query string included.
    pub fn request_url(&self, resource: &Resource) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = resource.path(&self.client_uuid);
        let raw = format!("{}/{}", base, path.trim_start_matches('/'));

        let mut url = Url::parse(&raw).map_err(|e| {
            SourceError::config(format!(
                "Invalid URL for resource '{}': {}",
                resource.name, e
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("meta", &FETCH_META.to_string())
            .append_pair("X-API-KEY", &self.api_key)
            .append_pair("weeks_back", &self.weeks.to_string());

        Ok(url)
    }

    /// Send the request and spool the CSV body.
    async fn download(&self, resource: &Resource) -> Result<SpooledBuffer> {
        let url = self.request_url(resource)?;
        // The query string carries the API key
        log::debug!("GET {}{}", self.base_url.origin().ascii_serialization(), url.path());

        let started = Instant::now();
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        log::trace!("Content-Type: {}", content_type);
        if !content_type.contains("csv") {
            return Err(SourceError::InvalidResponse("Non CSV response.".to_string()));
        }

        let mut writer = LossyUtf8Writer::new(SpooledBuffer::new(self.max_spool_size));
        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk)?;
        }
        if writer.replaced() > 0 {
            log::warn!(
                "Replaced {} invalid UTF-8 sequence(s) in '{}'",
                writer.replaced(),
                resource.name
            );
        }

        let mut spool = writer.finish()?;
        spool.rewind()?;
        log::debug!(
            "Spooled {} bytes for '{}' in {:?}{}",
            spool.len(),
            resource.name,
            started.elapsed(),
            if spool.is_spilled() { " (on disk)" } else { "" }
        );

        Ok(spool)
    }
}

impl Fetcher for OcrClient {
    type Rows = CsvRows<SpooledBuffer>;

    async fn fetch(&self, resource: &Resource) -> Result<Self::Rows> {
        let spool = self.download(resource).await?;
        CsvRows::new(spool)
    }
}
