//! Diff engine for canonical object serializations.
//!
//! Two interchangeable strategies are provided: [`TokenDiff`] produces inline
//! insert/delete spans, [`UnifiedDiff`] produces line hunks with context.
//! Both return structured output; turning it into text is left to
//! [`crate::display`].

mod token;
mod unified;

pub use token::TokenDiff;
pub use unified::UnifiedDiff;

use similar::ChangeTag;

use crate::config::{DiffMode, WatchConfig};

/// One unit of a computed difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSegment {
    Equal(String),
    Inserted(String),
    Deleted(String),
}

impl DiffSegment {
    pub(crate) fn from_change(tag: ChangeTag, text: &str) -> Self {
        match tag {
            ChangeTag::Equal => Self::Equal(text.to_string()),
            ChangeTag::Insert => Self::Inserted(text.to_string()),
            ChangeTag::Delete => Self::Deleted(text.to_string()),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Equal(t) | Self::Inserted(t) | Self::Deleted(t) => t,
        }
    }

    /// Whether this segment is an insertion or deletion.
    #[must_use]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Equal(_))
    }
}

/// A contiguous region of line changes with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// Zero-based first line in the old text.
    pub old_start: usize,
    pub old_len: usize,
    /// Zero-based first line in the new text.
    pub new_start: usize,
    pub new_len: usize,
    /// One segment per line, without trailing newlines.
    pub lines: Vec<DiffSegment>,
}

impl DiffHunk {
    /// Unified diff header, e.g. `@@ -3,7 +3,8 @@`.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            hunk_range(self.old_start, self.old_len),
            hunk_range(self.new_start, self.new_len)
        )
    }
}

fn hunk_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Structured output of a diff strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectDiff {
    /// Inline spans covering the whole text.
    Tokens(Vec<DiffSegment>),
    /// Line hunks.
    Lines(Vec<DiffHunk>),
}

impl ObjectDiff {
    fn segments(&self) -> Box<dyn Iterator<Item = &DiffSegment> + '_> {
        match self {
            Self::Tokens(segments) => Box::new(segments.iter()),
            Self::Lines(hunks) => Box::new(hunks.iter().flat_map(|h| h.lines.iter())),
        }
    }

    /// Whether any insertion or deletion is present.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.segments().any(DiffSegment::is_change)
    }

    #[must_use]
    pub fn insertions(&self) -> usize {
        self.segments()
            .filter(|s| matches!(s, DiffSegment::Inserted(_)))
            .count()
    }

    #[must_use]
    pub fn deletions(&self) -> usize {
        self.segments()
            .filter(|s| matches!(s, DiffSegment::Deleted(_)))
            .count()
    }
}

/// A way of comparing two serializations of the same object.
pub trait DiffStrategy: Send + Sync {
    /// Compare `old` with `new`.
    ///
    /// Returns `None` when there is no meaningful difference, in which case
    /// the event should produce no output.
    fn diff(&self, old: &str, new: &str) -> Option<ObjectDiff>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Build the strategy selected by `config`.
#[must_use]
pub fn strategy_for(config: &WatchConfig) -> Box<dyn DiffStrategy> {
    match config.diff_mode {
        DiffMode::Token => Box::new(TokenDiff::new(config.granularity)),
        DiffMode::Unified => Box::new(UnifiedDiff::new(config.context_lines)),
    }
}
