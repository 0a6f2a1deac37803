//! Bounded line reader for the event stream.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::error::WatchError;

/// Reads newline-delimited input one line at a time.
///
/// The line buffer grows as needed up to `max_line_bytes`; a longer line is a
/// fatal [`WatchError::LineTooLong`].
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    max_line_bytes: usize,
    buf: Vec<u8>,
    line_number: u64,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    #[must_use]
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            max_line_bytes,
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// Number of lines read so far.
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read the next line without its terminator, or `None` at EOF.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the JSON decoder
    /// reports the line if that makes it unusable.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or when the line exceeds the limit.
    pub async fn next_line(&mut self) -> Result<Option<String>, WatchError> {
        self.buf.clear();
        let limit = u64::try_from(self.max_line_bytes)
            .unwrap_or(u64::MAX)
            .saturating_add(1);

        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        } else if self.buf.len() > self.max_line_bytes {
            return Err(WatchError::LineTooLong {
                line: self.line_number,
                limit: self.max_line_bytes,
            });
        }

        let bytes = std::mem::take(&mut self.buf);
        Ok(Some(String::from_utf8(bytes).unwrap_or_else(|e| {
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        })))
    }
}
