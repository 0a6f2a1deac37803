//! Inline token diff.

use std::time::Duration;

use similar::utils::TextDiffRemapper;
use similar::{Algorithm, TextDiff};

use super::{DiffSegment, DiffStrategy, ObjectDiff};
use crate::config::Granularity;

/// Upper bound on time spent searching for a minimal edit script.
const DIFF_TIMEOUT: Duration = Duration::from_secs(1);

/// Minimal insert/delete/equal spans over the raw text.
#[derive(Debug, Clone)]
pub struct TokenDiff {
    granularity: Granularity,
    timeout: Duration,
}

impl TokenDiff {
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            timeout: DIFF_TIMEOUT,
        }
    }

    /// Compute the spans between `old` and `new`.
    #[must_use]
    pub fn segments(&self, old: &str, new: &str) -> Vec<DiffSegment> {
        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Myers).timeout(self.timeout);
        let diff = match self.granularity {
            Granularity::Chars => config.diff_chars(old, new),
            Granularity::Words => config.diff_words(old, new),
        };
        let remapper = TextDiffRemapper::from_text_diff(&diff, old, new);

        let mut segments: Vec<DiffSegment> = Vec::new();
        for (tag, text) in diff.ops().iter().flat_map(move |op| remapper.iter_slices(op)) {
            let segment = DiffSegment::from_change(tag, text);
            match (segments.last_mut(), &segment) {
                (Some(DiffSegment::Equal(prev)), DiffSegment::Equal(next))
                | (Some(DiffSegment::Inserted(prev)), DiffSegment::Inserted(next))
                | (Some(DiffSegment::Deleted(prev)), DiffSegment::Deleted(next)) => {
                    prev.push_str(next);
                }
                _ => segments.push(segment),
            }
        }
        segments
    }
}

impl DiffStrategy for TokenDiff {
    fn diff(&self, old: &str, new: &str) -> Option<ObjectDiff> {
        if old == new {
            return None;
        }
        let segments = self.segments(old, new);
        segments
            .iter()
            .any(DiffSegment::is_change)
            .then_some(ObjectDiff::Tokens(segments))
    }

    fn name(&self) -> &'static str {
        "token"
    }
}
