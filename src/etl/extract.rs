//! Extractor trait for pulling batches from a source

use crate::error::Result;

/// Extractor trait for pull-based sources
///
/// The host calls [`pull`](Extractor::pull) repeatedly and persists whatever
/// batch comes back. A returned batch is never empty; `None` marks the end
/// of the data. Calls must be sequential, which `&mut self` enforces.
///
/// # Example
/// ```no_run
/// use ocr_connector::etl::Extractor;
/// use ocr_connector::Result;
///
/// struct Countdown {
///     remaining: u32,
/// }
///
/// impl Extractor for Countdown {
///     type Item = u32;
///
///     async fn pull(&mut self) -> Result<Option<Vec<Self::Item>>> {
///         if self.remaining == 0 {
///             return Ok(None);
///         }
///         self.remaining -= 1;
///         Ok(Some(vec![self.remaining]))
///     }
/// }
/// ```
pub trait Extractor: Send {
    /// The type of items extracted
    type Item: Send;

    /// Pull the next batch from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, response, decoding, etc.)
    /// The failed pull may be retried by calling `pull` again.
    fn pull(
        &mut self,
    ) -> impl std::future::Future<Output = Result<Option<Vec<Self::Item>>>> + Send;
}
