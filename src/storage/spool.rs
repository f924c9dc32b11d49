//! Size-bounded response buffer
//!
//! Report responses can be arbitrarily large and there is no way of
//! knowing their size up front. The buffer keeps content in memory until
//! it grows past `max_size`, then moves it to an anonymous temporary file.

use std::io::{self, Read, Seek, SeekFrom, Write};
use tempfile::SpooledTempFile;

/// Default spill threshold (100 MiB)
pub const DEFAULT_MAX_SPOOL_SIZE: usize = 100 * 1024 * 1024;

/// Sequential write-then-read byte store that spills to disk
pub struct SpooledBuffer {
    inner: SpooledTempFile,
    written: u64,
}

impl SpooledBuffer {
    /// Create an empty buffer that stays in memory up to `max_size` bytes
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: SpooledTempFile::new(max_size),
            written: 0,
        }
    }

    /// Move the read position back to the start of the content
    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Whether the content has been moved to a temporary file
    pub fn is_spilled(&self) -> bool {
        self.inner.is_rolled()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> u64 {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }
}

impl Default for SpooledBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPOOL_SIZE)
    }
}

impl Write for SpooledBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Read for SpooledBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl std::fmt::Debug for SpooledBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpooledBuffer")
            .field("len", &self.written)
            .field("spilled", &self.is_spilled())
            .finish()
    }
}
