//! Source configuration
//!
//! The configuration is read once, before the source is built, usually from
//! a YAML file:
//! ```yaml
//! clientUUID: 0d3f5c2e-...
//! apiKey: secret
//! weeks: 2
//! resources:
//!   - name: reports csv
//!     value: v5/clients/%s/reports/export
//! ```
//!
//! `destination` and `idpattern` are not interpreted by the source. They are
//! filled with defaults when absent so the host pipeline can rely on them.

use crate::error::{Result, SourceError};
use crate::storage::DEFAULT_MAX_SPOOL_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const BASE_URL: &str = "https://api.oneclickretail.com";
pub const DESTINATION: &str = "ocr_reports_csv";
pub const IDPATTERN: &str = "{week_asin}";
pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const DEFAULT_WEEKS_BACK: u32 = 1;

/// Placeholder substituted with the client identifier
const PLACEHOLDER: &str = "%s";

/// One report endpoint to fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    /// Display name, used in progress messages
    pub name: String,
    /// URL path template with a single `%s` placeholder for the client id
    pub value: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Path of this resource for the given client
    pub fn path(&self, client_id: &str) -> String {
        self.value.replacen(PLACEHOLDER, client_id, 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(rename = "clientUUID", default)]
    pub client_uuid: String,
    #[serde(default)]
    pub api_key: String,
    /// Number of weeks of report data to request
    #[serde(default = "default_weeks")]
    pub weeks: u32,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idpattern: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum number of rows per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Response size above which the body is spooled to disk
    #[serde(default = "default_max_spool_size")]
    pub max_spool_size: usize,
}

fn default_weeks() -> u32 {
    DEFAULT_WEEKS_BACK
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_spool_size() -> usize {
    DEFAULT_MAX_SPOOL_SIZE
}

impl SourceConfig {
    pub fn new(
        client_uuid: impl Into<String>,
        api_key: impl Into<String>,
        resources: Vec<Resource>,
    ) -> Self {
        Self {
            client_uuid: client_uuid.into(),
            api_key: api_key.into(),
            weeks: DEFAULT_WEEKS_BACK,
            resources,
            destination: None,
            idpattern: None,
            base_url: default_base_url(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_spool_size: DEFAULT_MAX_SPOOL_SIZE,
        }
    }

    pub fn with_weeks(mut self, weeks: u32) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_spool_size(mut self, max_spool_size: usize) -> Self {
        self.max_spool_size = max_spool_size;
        self
    }

    /// Read configuration from a YAML file
    pub fn read(path: impl AsRef<Path>) -> eyre::Result<Self> {
        use eyre::WrapErr;

        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read source config: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse source config YAML: {}", path.display()))
    }

    /// Fill in `destination` and `idpattern` when they are absent or empty
    pub fn apply_defaults(&mut self) {
        if self.destination.as_deref().is_none_or(str::is_empty) {
            self.destination = Some(DESTINATION.to_string());
        }
        if self.idpattern.as_deref().is_none_or(str::is_empty) {
            self.idpattern = Some(IDPATTERN.to_string());
        }
    }

    /// Check the configuration can drive a source
    ///
    /// # Errors
    /// Returns [`SourceError::Configuration`] if:
    /// - No resources are configured
    /// - A resource path does not contain exactly one `%s` placeholder
    /// - The batch size is zero
    /// - The base URL cannot be parsed
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(SourceError::config("No resources selected"));
        }

        for resource in &self.resources {
            if resource.value.matches(PLACEHOLDER).count() != 1 {
                return Err(SourceError::config(format!(
                    "Resource '{}' must contain exactly one {} placeholder: {}",
                    resource.name, PLACEHOLDER, resource.value
                )));
            }
        }

        if self.batch_size == 0 {
            return Err(SourceError::config("Batch size must be greater than zero"));
        }

        Url::parse(&self.base_url).map_err(|e| {
            SourceError::config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        Ok(())
    }

    pub fn destination(&self) -> &str {
        self.destination.as_deref().unwrap_or(DESTINATION)
    }

    pub fn idpattern(&self) -> &str {
        self.idpattern.as_deref().unwrap_or(IDPATTERN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> SourceConfig {
        SourceConfig::new(
            "testUUID",
            "testKey",
            vec![Resource::new("reports csv", "v5/clients/%s/reports/export")],
        )
    }

    #[test]
    fn test_resource_path() {
        let resource = Resource::new("reports csv", "v5/clients/%s/reports/export");
        assert_eq!(resource.path("abc"), "v5/clients/abc/reports/export");
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = config();
        config.apply_defaults();
        assert_eq!(config.destination.as_deref(), Some(DESTINATION));
        assert_eq!(config.idpattern.as_deref(), Some(IDPATTERN));
        assert_eq!(config.weeks, DEFAULT_WEEKS_BACK);
    }

    #[test]
    fn test_apply_defaults_keeps_explicit_values() {
        let mut config = config();
        config.destination = Some("custom".to_string());
        config.idpattern = Some("{id}".to_string());
        config.apply_defaults();
        assert_eq!(config.destination(), "custom");
        assert_eq!(config.idpattern(), "{id}");
    }

    #[test]
    fn test_validate_requires_resources() {
        let mut config = config();
        config.resources.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SourceError::Configuration(_)));
        assert!(err.to_string().contains("No resources selected"));
    }

    #[test]
    fn test_validate_placeholder() {
        let mut config = config();
        config.resources.push(Resource::new("broken", "v5/reports"));
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.resources.push(Resource::new("twice", "v5/%s/%s"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_batch_size_and_url() {
        assert!(config().with_batch_size(0).validate().is_err());
        assert!(config().with_base_url("not a url").validate().is_err());
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_read_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("source.yml");
        std::fs::write(
            &path,
            "clientUUID: testUUID\napiKey: testKey\nresources:\n  - name: reports csv\n    value: v5/clients/%s/reports/export\n",
        )
        .unwrap();

        let config = SourceConfig::read(&path).unwrap();
        assert_eq!(config.client_uuid, "testUUID");
        assert_eq!(config.api_key, "testKey");
        assert_eq!(config.weeks, DEFAULT_WEEKS_BACK);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.resources.len(), 1);
        assert!(config.destination.is_none());
    }

    #[test]
    fn test_read_yaml_without_resources() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("source.yml");
        std::fs::write(&path, "clientUUID: testUUID\napiKey: testKey\nweeks: 4\n").unwrap();

        let config = SourceConfig::read(&path).unwrap();
        assert_eq!(config.weeks, 4);
        assert!(config.validate().is_err());
    }
}
