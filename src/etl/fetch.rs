//! Fetcher trait for turning a resource into a row sequence

use crate::config::Resource;
use crate::decode::Row;
use crate::error::Result;

/// Fetches a single resource and returns its rows
///
/// The returned iterator is consumed lazily by the caller. Implementations
/// should not read rows ahead of it.
pub trait Fetcher: Send + Sync {
    /// Lazy sequence of decoded rows
    type Rows: Iterator<Item = Result<Row>> + Send;

    /// Issue the request for `resource` and prepare its rows
    ///
    /// # Errors
    /// Returns an error if the request fails or the response is not usable
    fn fetch(
        &self,
        resource: &Resource,
    ) -> impl std::future::Future<Output = Result<Self::Rows>> + Send;
}
