//! Per-event state machine over the object store.

use std::sync::Arc;

use chrono::{DateTime, Local};

use super::error::WatchError;
use crate::canonical::{self, WIDE_INDENT};
use crate::config::WatchConfig;
use crate::diff::{strategy_for, DiffStrategy};
use crate::display::{self, Renderer};
use crate::event::{classify, decode_line, ClassifiedEvent, EventType, ObjectRef, WatchEvent};
use crate::store::ObjectStore;

/// Counters for one watch stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Non-empty input lines handled.
    pub lines: u64,
    /// Logical events after list expansion.
    pub events: u64,
    /// Events that produced output.
    pub rendered: u64,
    /// MODIFIED events dropped for having no meaningful difference.
    pub suppressed: u64,
    /// Malformed lines and missing-state diagnostics.
    pub diagnostics: u64,
}

/// Turns input lines into rendered output blocks.
///
/// Cloning forks the stream state; the diff strategy is shared.
#[derive(Clone)]
pub struct Processor {
    store: ObjectStore,
    strategy: Arc<dyn DiffStrategy>,
    renderer: Renderer,
    pretty_before_diff: bool,
    body_on_added: bool,
    stats: WatchStats,
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("objects", &self.store.len())
            .field("strategy", &self.strategy.name())
            .field("renderer", &self.renderer)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Processor {
    /// Create a processor with an empty store.
    #[must_use]
    pub fn new(config: &WatchConfig) -> Self {
        Self::with_strategy(config, strategy_for(config))
    }

    /// Create a processor using an explicit diff strategy.
    #[must_use]
    pub fn with_strategy(config: &WatchConfig, strategy: Box<dyn DiffStrategy>) -> Self {
        Self {
            store: ObjectStore::new(),
            strategy: Arc::from(strategy),
            renderer: Renderer {
                color: config.color,
                no_ellipsis: config.no_ellipsis,
            },
            pretty_before_diff: config.pretty_before_diff,
            body_on_added: config.body_on_added,
            stats: WatchStats::default(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    #[must_use]
    pub fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Handle one input line, returning the blocks to print.
    ///
    /// Malformed lines yield a diagnostic block rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Serialize`] if an object cannot be serialized.
    pub fn handle_line(
        &mut self,
        line_number: u64,
        line: &str,
        now: &DateTime<Local>,
    ) -> Result<Vec<String>, WatchError> {
        self.stats.lines += 1;
        let ts = display::timestamp(now);

        let events = match decode_line(line) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "Skipping malformed watch event");
                self.stats.diagnostics += 1;
                return Ok(vec![self.renderer.malformed(&ts, line_number, &e)]);
            }
        };

        let mut blocks = Vec::with_capacity(events.len());
        for event in events {
            if let Some(block) = self.handle_event(line_number, event, &ts)? {
                blocks.push(block);
            }
        }
        Ok(blocks)
    }

    fn handle_event(
        &mut self,
        line_number: u64,
        event: WatchEvent,
        ts: &str,
    ) -> Result<Option<String>, WatchError> {
        self.stats.events += 1;

        // Watch ERROR statuses carry no kind; report them like any unknown type.
        if let EventType::Unknown(raw) = &event.event_type {
            tracing::debug!(event_type = %raw, "Unknown watch event type");
            self.stats.rendered += 1;
            let reference = ObjectRef::describe(&event.object);
            return Ok(Some(self.renderer.unknown(ts, raw, &reference)));
        }

        let event = match classify(event) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "Skipping unclassifiable object");
                self.stats.diagnostics += 1;
                return Ok(Some(self.renderer.malformed(ts, line_number, &e)));
            }
        };
        tracing::debug!(
            event_type = %event.event_type,
            identity = %event.identity,
            object = %event.reference,
            "Processing watch event"
        );

        let block = match event.event_type.clone() {
            EventType::Added if self.store.contains(&event.identity) => {
                tracing::debug!(identity = %event.identity, "ADDED for known object, diffing");
                self.modified(event, ts)?
            }
            EventType::Added => Some(self.added(event, ts)?),
            EventType::Modified => self.modified(event, ts)?,
            EventType::Deleted => Some(self.renderer.deleted(ts, &event.reference)),
            // Rendered before classification.
            EventType::Unknown(_) => None,
        };

        if block.is_some() {
            self.stats.rendered += 1;
        }
        Ok(block)
    }

    fn added(&mut self, event: ClassifiedEvent, ts: &str) -> Result<String, WatchError> {
        let canonical = canonical::to_canonical(&event.object)?;
        let body = self.body_on_added.then_some(canonical.as_str());
        let block = self.renderer.added(ts, &event.reference, body);
        self.store.insert(event.identity, canonical);
        Ok(block)
    }

    fn modified(&mut self, event: ClassifiedEvent, ts: &str) -> Result<Option<String>, WatchError> {
        let Some(old) = self.store.get(&event.identity) else {
            tracing::debug!(identity = %event.identity, "No stored state for MODIFIED event");
            self.stats.diagnostics += 1;
            return Ok(Some(self.renderer.missing_old_value(
                ts,
                &event.identity,
                &event.reference,
            )));
        };

        let new = canonical::to_canonical(&event.object)?;
        let diff = if self.pretty_before_diff {
            self.strategy.diff(
                &canonical::reindent(old, WIDE_INDENT)?,
                &canonical::reindent(&new, WIDE_INDENT)?,
            )
        } else {
            self.strategy.diff(old, &new)
        };
        self.store.insert(event.identity, new);

        match diff {
            Some(diff) => {
                tracing::debug!(
                    object = %event.reference,
                    strategy = self.strategy.name(),
                    insertions = diff.insertions(),
                    deletions = diff.deletions(),
                    "Rendering diff"
                );
                Ok(Some(self.renderer.modified(ts, &event.reference, &diff)))
            }
            None => {
                tracing::debug!(object = %event.reference, "No meaningful difference, suppressing");
                self.stats.suppressed += 1;
                Ok(None)
            }
        }
    }
}
