//! NDJSON (Newline Delimited JSON) file operations

use crate::decode::Row;
use crate::etl::Loader;

use eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::Value;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Read NDJSON from a file
pub struct NdjsonReader {
    path: PathBuf,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all lines as JSON values
    pub fn read(&self) -> Result<Vec<Value>> {
        let content = std::fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("Failed to read NDJSON file: {}", self.path.display()))?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .wrap_err_with(|| format!("Failed to parse JSON line: {}", line))
            })
            .collect()
    }
}

/// Write batches as NDJSON to a file
///
/// The file is truncated once on creation; every loaded batch is appended.
pub struct NdjsonWriter {
    path: PathBuf,
}

impl NdjsonWriter {
    /// Create (or truncate) the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::File::create(&path)
            .wrap_err_with(|| format!("Failed to create NDJSON file: {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append items to the NDJSON file
    pub fn append<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .wrap_err_with(|| format!("Failed to open NDJSON file: {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        for item in items {
            serde_json::to_writer(&mut writer, item)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(())
    }
}

// Implement Loader trait for writing batches of rows

impl Loader for NdjsonWriter {
    type Item = Row;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.append(&items)?;
        Ok(items.len())
    }
}
