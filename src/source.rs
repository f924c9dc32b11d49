//! Report source
//!
//! [`OcrSource`] walks the configured resources and hands out their rows in
//! bounded batches. A resource is fetched on the first pull that reaches
//! it; its rows are then drained across as many pulls as needed before the
//! next resource is touched.
//!
//! Resources are taken from the end of the configured list, so the last
//! configured resource is processed first.

use crate::client::OcrClient;
use crate::config::{Resource, SourceConfig};
use crate::decode::Row;
use crate::error::Result;
use crate::etl::{Extractor, Fetcher};

/// Progress callback: `(processed, total, message)`
pub type ProgressFn = Box<dyn FnMut(usize, usize, &str) + Send>;

/// The resource currently being drained
struct Active<R> {
    resource: Resource,
    rows: Option<R>,
}

/// Pull-based source over One Click Retail report resources
///
/// # Example
/// ```no_run
/// use ocr_connector::etl::Extractor;
/// use ocr_connector::{OcrSource, Resource, SourceConfig};
///
/// # async fn example() -> ocr_connector::Result<()> {
/// let config = SourceConfig::new(
///     "client-uuid",
///     "api-key",
///     vec![Resource::new("reports csv", "v5/clients/%s/reports/export")],
/// );
/// let mut source = OcrSource::try_new(config)?
///     .with_progress(|done, total, msg| println!("[{}/{}] {}", done, total, msg));
///
/// while let Some(batch) = source.pull().await? {
///     println!("{} rows", batch.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct OcrSource<F: Fetcher = OcrClient> {
    config: SourceConfig,
    fetcher: F,
    worklist: Vec<Resource>,
    active: Option<Active<F::Rows>>,
    processed: usize,
    total: usize,
    progress: ProgressFn,
}

impl OcrSource<OcrClient> {
    /// Create a source backed by the One Click Retail API
    ///
    /// # Errors
    /// Returns [`SourceError::Configuration`](crate::SourceError::Configuration)
    /// if the configuration is invalid (e.g. "No resources selected"), or a
    /// protocol error if the HTTP client cannot be built.
    pub fn try_new(config: SourceConfig) -> Result<Self> {
        let client = OcrClient::try_new(&config)?;
        Self::with_fetcher(config, client)
    }
}

impl<F: Fetcher> OcrSource<F> {
    /// Create a source that fetches resources through `fetcher`
    ///
    /// Injects the `destination` and `idpattern` defaults and validates the
    /// configuration.
    pub fn with_fetcher(mut config: SourceConfig, fetcher: F) -> Result<Self> {
        config.apply_defaults();
        config.validate()?;

        let worklist = config.resources.clone();
        let total = worklist.len();
        log::debug!("Source created with {} resource(s)", total);

        Ok(Self {
            config,
            fetcher,
            worklist,
            active: None,
            processed: 0,
            total,
            progress: Box::new(log_progress),
        })
    }

    /// Replace the progress callback
    ///
    /// The callback runs once each time a new resource is started.
    pub fn with_progress(
        mut self,
        progress: impl FnMut(usize, usize, &str) + Send + 'static,
    ) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// The configuration, with defaults applied
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Number of resources started so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Number of configured resources
    pub fn total(&self) -> usize {
        self.total
    }

    /// Resources not yet started
    pub fn remaining(&self) -> &[Resource] {
        &self.worklist
    }

    /// The resource currently being drained, if any
    pub fn current(&self) -> Option<&Resource> {
        self.active.as_ref().map(|active| &active.resource)
    }

    fn report(&mut self, message: &str) {
        (self.progress)(self.processed, self.total, message);
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Row>>> {
        let batch_size = self.config.batch_size;

        loop {
            let active = match &mut self.active {
                Some(active) => active,
                None => {
                    let Some(resource) = self.worklist.pop() else {
                        log::debug!("All {} resource(s) processed", self.total);
                        return Ok(None);
                    };
                    self.processed += 1;
                    self.report(&format!("Fetching data for {}", resource.name));
                    self.active.insert(Active {
                        resource,
                        rows: None,
                    })
                }
            };

            // A failed fetch leaves the resource active, so the next pull
            // retries it without counting it again.
            let rows = match &mut active.rows {
                Some(rows) => rows,
                None => active.rows.insert(self.fetcher.fetch(&active.resource).await?),
            };

            let batch = rows.by_ref().take(batch_size).collect::<Result<Vec<_>>>()?;

            if batch.is_empty() {
                log::debug!("Resource '{}' exhausted", active.resource.name);
                self.active = None;
                continue;
            }

            log::trace!(
                "Pulled {} row(s) from '{}'",
                batch.len(),
                active.resource.name
            );
            return Ok(Some(batch));
        }
    }
}

impl<F: Fetcher> Extractor for OcrSource<F> {
    type Item = Row;

    async fn pull(&mut self) -> Result<Option<Vec<Self::Item>>> {
        self.next_batch().await
    }
}

fn log_progress(processed: usize, total: usize, message: &str) {
    log::info!("[{}/{}] {}", processed, total, message);
}
