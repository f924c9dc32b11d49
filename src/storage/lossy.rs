//! UTF-8 normalization for response bodies
//!
//! The reporting API does not guarantee valid UTF-8. Every byte that goes
//! into a spool passes through [`LossyUtf8Writer`], so downstream readers
//! only ever see valid UTF-8.

use std::io::{self, Write};

const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// Writer adapter that replaces invalid UTF-8 with U+FFFD
///
/// Input may arrive in arbitrary chunks. A multi-byte character split
/// between two writes is held back until the rest of it arrives, so only
/// genuinely invalid sequences are replaced. Call [`finish`](Self::finish)
/// once the input is complete to flush a dangling partial character.
pub struct LossyUtf8Writer<W: Write> {
    inner: W,
    pending: Vec<u8>,
    replaced: usize,
}

impl<W: Write> LossyUtf8Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(4),
            replaced: 0,
        }
    }

    /// Number of replacement characters emitted so far
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Flush any incomplete trailing sequence and return the inner writer
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.inner.write_all(REPLACEMENT)?;
            self.replaced += 1;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_normalized(&mut self, mut input: &[u8]) -> io::Result<()> {
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    self.inner.write_all(valid.as_bytes())?;
                    return Ok(());
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    self.inner.write_all(valid)?;
                    match e.error_len() {
                        Some(len) => {
                            self.inner.write_all(REPLACEMENT)?;
                            self.replaced += 1;
                            input = &rest[len..];
                        }
                        None => {
                            // Truncated character at the end of the chunk
                            self.pending.extend_from_slice(rest);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

impl<W: Write> Write for LossyUtf8Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            self.write_normalized(buf)?;
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(buf);
            self.write_normalized(&joined)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
