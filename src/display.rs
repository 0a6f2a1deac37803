//! Colored rendering of watch events.
//!
//! Every function here returns the text to print; nothing writes to a stream
//! or touches the object store. Colors are emitted only when enabled so the
//! same output can be compared in tests or piped to files.

use std::borrow::Cow;

use chrono::{DateTime, TimeZone};
use owo_colors::{OwoColorize, Style};

use crate::diff::{DiffHunk, DiffSegment, ObjectDiff};
use crate::event::{EventError, EventType, ObjectIdentity, ObjectRef};

/// Unchanged spans longer than this are compacted.
pub const ELLIPSIS_THRESHOLD: usize = 30;
/// Characters kept from a compacted span, before the `...`.
pub const ELLIPSIS_KEEP: usize = ELLIPSIS_THRESHOLD - 3;

/// Format a timestamp with millisecond precision, e.g. `Jan  2 15:04:05.000`.
#[must_use]
pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%b %e %H:%M:%S%.3f").to_string()
}

/// Shorten a long unchanged span to its first characters plus `...`.
#[must_use]
pub fn compact(text: &str, no_ellipsis: bool) -> Cow<'_, str> {
    if no_ellipsis || text.chars().count() <= ELLIPSIS_THRESHOLD {
        return Cow::Borrowed(text);
    }
    let cut = text
        .char_indices()
        .nth(ELLIPSIS_KEEP)
        .map_or(text.len(), |(idx, _)| idx);
    Cow::Owned(format!("{}...", &text[..cut]))
}

/// Renderer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    /// Emit ANSI escape sequences.
    pub color: bool,
    /// Keep long unchanged spans intact.
    pub no_ellipsis: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            color: true,
            no_ellipsis: false,
        }
    }
}

impl Renderer {
    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn prefix(&self, ts: &str) -> String {
        self.paint(ts, Style::new().white().dimmed())
    }

    fn label(&self, event_type: &EventType) -> String {
        let style = match event_type {
            EventType::Added => Style::new().green().bold(),
            EventType::Modified => Style::new().yellow().bold(),
            EventType::Deleted => Style::new().red().bold(),
            EventType::Unknown(_) => Style::new(),
        };
        self.paint(event_type.label(), style)
    }

    fn headline(&self, ts: &str, event_type: &EventType, object: &ObjectRef) -> String {
        format!("{} {} {object}", self.prefix(ts), self.label(event_type))
    }

    /// ADDED line, optionally followed by the full object body.
    #[must_use]
    pub fn added(&self, ts: &str, object: &ObjectRef, body: Option<&str>) -> String {
        let head = self.headline(ts, &EventType::Added, object);
        match body {
            Some(body) => format!("{head} - {}", self.paint(body, Style::new().green())),
            None => head,
        }
    }

    /// MODIFIED line with the rendered diff.
    #[must_use]
    pub fn modified(&self, ts: &str, object: &ObjectRef, diff: &ObjectDiff) -> String {
        let head = self.headline(ts, &EventType::Modified, object);
        match diff {
            ObjectDiff::Tokens(segments) => format!("{head} - {}", self.tokens(segments)),
            ObjectDiff::Lines(hunks) => format!("{head}\n{}", self.unified(hunks)),
        }
    }

    #[must_use]
    pub fn deleted(&self, ts: &str, object: &ObjectRef) -> String {
        self.headline(ts, &EventType::Deleted, object)
    }

    /// Informational line for an event type outside ADDED/MODIFIED/DELETED.
    #[must_use]
    pub fn unknown(&self, ts: &str, raw_type: &str, object: &ObjectRef) -> String {
        format!("{} Unknown event type: {raw_type} {object}", self.prefix(ts))
    }

    /// Diagnostic for a MODIFIED event with no stored prior state.
    #[must_use]
    pub fn missing_old_value(&self, ts: &str, identity: &ObjectIdentity, object: &ObjectRef) -> String {
        let message = format!("Error: no old value for uid {identity} ({object})");
        format!("{} {}", self.prefix(ts), self.paint(&message, Style::new().red()))
    }

    /// Diagnostic for an input line that could not be used.
    #[must_use]
    pub fn malformed(&self, ts: &str, line_number: u64, error: &EventError) -> String {
        let message = format!("Error: skipping line {line_number}: {error}");
        format!("{} {}", self.prefix(ts), self.paint(&message, Style::new().red()))
    }

    /// Inline rendering of token spans.
    #[must_use]
    pub fn tokens(&self, segments: &[DiffSegment]) -> String {
        let mut out = String::new();
        for segment in segments {
            match segment {
                DiffSegment::Inserted(text) if self.color => {
                    out.push_str(&self.paint(text, Style::new().green()));
                }
                DiffSegment::Deleted(text) if self.color => {
                    out.push_str(&self.paint(text, Style::new().red().strikethrough()));
                }
                // Without colors, mark changes wdiff-style.
                DiffSegment::Inserted(text) => out.push_str(&format!("{{+{text}+}}")),
                DiffSegment::Deleted(text) => out.push_str(&format!("[-{text}-]")),
                DiffSegment::Equal(text) => out.push_str(&compact(text, self.no_ellipsis)),
            }
        }
        out
    }

    /// Line-by-line rendering of unified hunks.
    #[must_use]
    pub fn unified(&self, hunks: &[DiffHunk]) -> String {
        let mut lines = Vec::new();
        for hunk in hunks {
            lines.push(self.paint(&hunk.header(), Style::new().cyan()));
            for line in &hunk.lines {
                lines.push(match line {
                    DiffSegment::Equal(text) => format!(" {text}"),
                    DiffSegment::Inserted(text) => self.paint(&format!("+{text}"), Style::new().green()),
                    DiffSegment::Deleted(text) => self.paint(&format!("-{text}"), Style::new().red()),
                });
            }
        }
        lines.join("\n")
    }
}
