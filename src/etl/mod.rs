//! Core pull/load abstractions
//!
//! This module provides the trait definitions that connect a pull-based
//! source to the host that persists its batches.

mod extract;
mod fetch;
mod load;
mod pipeline;

pub use extract::Extractor;
pub use fetch::Fetcher;
pub use load::Loader;
pub use pipeline::Pipeline;
