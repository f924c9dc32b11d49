//! Streaming CSV decoding
//!
//! Turns any [`Read`] into a lazy sequence of [`Row`]s keyed by the first
//! record. Nothing beyond the header is read until rows are pulled.

use crate::error::Result;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Read;
use std::sync::Arc;

/// One decoded CSV record, keyed by the header
///
/// Rows decoded from the same document share a single header record.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    headers: Arc<StringRecord>,
    record: StringRecord,
}

impl Row {
    /// Get the value of a column by header name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.record.get(i))
    }

    /// Iterate `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().zip(self.record.iter())
    }

    /// Number of fields in the row
    pub fn len(&self) -> usize {
        self.record.len()
    }

    /// Whether the row has no fields
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Lazy, forward-only iterator of [`Row`]s over a CSV document
///
/// Records whose field count differs from the header surface as
/// [`SourceError::Decode`](crate::SourceError::Decode) when they are
/// reached, not before.
pub struct CsvRows<R> {
    headers: Arc<StringRecord>,
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> CsvRows<R> {
    /// Read the header record from `reader` and prepare to decode rows
    ///
    /// An empty document has no header and produces no rows.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        let headers = Arc::new(reader.headers()?.clone());
        log::trace!("CSV header: {:?}", headers);

        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }

    /// The header record every row is keyed by
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|record| Row {
                    headers: Arc::clone(&self.headers),
                    record,
                })
                .map_err(Into::into),
        )
    }
}

impl<R> std::fmt::Debug for CsvRows<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRows")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
