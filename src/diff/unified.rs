//! Unified line diff.

use similar::{DiffOp, TextDiff};

use super::{DiffHunk, DiffSegment, DiffStrategy, ObjectDiff};
use crate::config::ContextLines;

/// Line diff grouped into hunks with a configurable context radius.
#[derive(Debug, Clone)]
pub struct UnifiedDiff {
    context: ContextLines,
}

impl UnifiedDiff {
    #[must_use]
    pub fn new(context: ContextLines) -> Self {
        Self { context }
    }

    fn radius(&self, old: &str, new: &str) -> usize {
        match self.context {
            ContextLines::Lines(n) => n,
            ContextLines::Whole => old.lines().count().max(new.lines().count()),
        }
    }

    /// Compute the hunks between `old` and `new`.
    #[must_use]
    pub fn hunks(&self, old: &str, new: &str) -> Vec<DiffHunk> {
        let diff = TextDiff::from_lines(old, new);

        diff.grouped_ops(self.radius(old, new))
            .iter()
            .filter_map(|group| {
                let (first, last) = (group.first()?, group.last()?);
                let lines = group
                    .iter()
                    .flat_map(|op| diff.iter_changes(op))
                    .map(|change| {
                        let text = change.value().trim_end_matches('\n').trim_end_matches('\r');
                        DiffSegment::from_change(change.tag(), text)
                    })
                    .collect();

                Some(DiffHunk {
                    old_start: first.old_range().start,
                    old_len: span(first, last, DiffOp::old_range),
                    new_start: first.new_range().start,
                    new_len: span(first, last, DiffOp::new_range),
                    lines,
                })
            })
            .collect()
    }
}

fn span(first: &DiffOp, last: &DiffOp, range: fn(&DiffOp) -> std::ops::Range<usize>) -> usize {
    range(last).end.saturating_sub(range(first).start)
}

impl DiffStrategy for UnifiedDiff {
    fn diff(&self, old: &str, new: &str) -> Option<ObjectDiff> {
        if old == new {
            return None;
        }
        let hunks = self.hunks(old, new);
        let diff = ObjectDiff::Lines(hunks);
        diff.has_changes().then_some(diff)
    }

    fn name(&self) -> &'static str {
        "unified"
    }
}
