//! Pipeline orchestration for pull/load operations

use super::{Extractor, Loader};
use eyre::{Result, WrapErr};

/// Pipeline that drains an [`Extractor`] into a [`Loader`], batch by batch
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `L`: Loader type (must load E::Item)
///
/// # Example
/// ```no_run
/// use ocr_connector::etl::Pipeline;
/// use ocr_connector::storage::NdjsonWriter;
/// use ocr_connector::{OcrSource, Resource, SourceConfig};
///
/// # async fn example() -> eyre::Result<()> {
/// let config = SourceConfig::new(
///     "client-uuid",
///     "api-key",
///     vec![Resource::new("reports csv", "v5/clients/%s/reports/export")],
/// );
/// let source = OcrSource::try_new(config)?;
/// let writer = NdjsonWriter::create("reports.ndjson")?;
///
/// let mut pipeline = Pipeline::new(source, writer);
/// let count = pipeline.run().await?;
/// println!("Loaded {} rows", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, L> {
    extractor: E,
    loader: L,
}

impl<E, L> Pipeline<E, L>
where
    E: Extractor,
    L: Loader<Item = E::Item>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, loader: L) -> Self {
        Self { extractor, loader }
    }

    /// Pull batches until the extractor is exhausted, loading each one
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns the first pull or load error. Batches loaded before the
    /// error stay loaded.
    pub async fn run(&mut self) -> Result<usize> {
        log::info!("Starting pipeline");

        let mut batches = 0usize;
        let mut loaded = 0usize;
        while let Some(batch) = self
            .extractor
            .pull()
            .await
            .wrap_err_with(|| format!("Failed to pull batch {}", batches + 1))?
        {
            log::debug!("Pulled batch {} with {} items", batches + 1, batch.len());
            loaded += self.loader.load(batch).await?;
            batches += 1;
        }

        if loaded == 0 {
            log::warn!("No items extracted, pipeline complete");
        } else {
            log::info!("Loaded {} items in {} batches", loaded, batches);
        }

        Ok(loaded)
    }
}
