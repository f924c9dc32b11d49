//! One Click Retail API client.
//!
//! This module provides the [`OcrClient`], the HTTP side of the source: it
//! builds report URLs, issues requests and spools CSV responses.

mod ocr;

pub use ocr::OcrClient;
