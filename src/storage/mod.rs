//! Local storage for report data
//!
//! This module handles all byte and file handling:
//! - Spooling response bodies to memory or disk
//! - UTF-8 normalization of response bytes
//! - NDJSON output of decoded batches

mod lossy;
mod ndjson;
mod spool;

pub use lossy::LossyUtf8Writer;
pub use ndjson::{NdjsonReader, NdjsonWriter};
pub use spool::{DEFAULT_MAX_SPOOL_SIZE, SpooledBuffer};
