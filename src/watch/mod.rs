//! The watch-changes stream loop.
//!
//! Reads one event line at a time, processes it completely, and writes the
//! rendered output before reading the next line.

mod error;
mod processor;
mod reader;

pub use error::WatchError;
pub use processor::{Processor, WatchStats};
pub use reader::LineReader;

use std::io::Write;

use chrono::Local;
use tokio::io::AsyncBufRead;

/// Process lines from `reader` until EOF, writing rendered blocks to `out`.
///
/// Blank lines are ignored. Output is flushed after every line so a live
/// stream shows up immediately.
///
/// # Errors
///
/// Returns an error on read or write failure, when a line exceeds the
/// reader's limit, or if an object cannot be serialized.
pub async fn run<R, W>(
    reader: &mut LineReader<R>,
    processor: &mut Processor,
    out: &mut W,
) -> Result<WatchStats, WatchError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    tracing::info!("Watching for changes");

    while let Some(line) = reader.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let blocks = processor.handle_line(reader.line_number(), trimmed, &Local::now())?;
        for block in blocks {
            writeln!(out, "{block}")?;
        }
        out.flush()?;
    }

    out.flush()?;
    let stats = processor.stats();
    tracing::info!(
        lines = stats.lines,
        events = stats.events,
        rendered = stats.rendered,
        suppressed = stats.suppressed,
        diagnostics = stats.diagnostics,
        objects = processor.store().len(),
        "Input stream ended"
    );
    Ok(stats)
}
