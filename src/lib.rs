//! One Click Retail report connector
//!
//! Pulls CSV reports from the One Click Retail API and hands them to a host
//! pipeline in bounded batches of rows.

pub mod cli;
pub mod client;
pub mod config;
pub mod decode;
mod error;
pub mod etl;
pub mod source;
pub mod storage;

// Re-exports for convenience
pub use client::OcrClient;
pub use config::{Resource, SourceConfig};
pub use decode::{CsvRows, Row};
pub use error::{Result, SourceError};
pub use etl::{Extractor, Fetcher, Loader, Pipeline};
pub use source::OcrSource;
pub use storage::{NdjsonReader, NdjsonWriter, SpooledBuffer};
