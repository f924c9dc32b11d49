//! Loader trait for loading batches to destinations

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// Implementors define how to persist each pulled batch:
/// - NDJSON files
/// - Databases
/// - Message queues
///
/// # Example
/// ```no_run
/// use ocr_connector::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct FileLoader {
///     output_dir: PathBuf,
/// }
///
/// impl Loader for FileLoader {
///     type Item = String;
///
///     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         // Write items to files
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load one batch to the destination
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, serialization, etc.)
    fn load(
        &self,
        items: Vec<Self::Item>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}
