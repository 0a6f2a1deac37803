//! Decoder for newline-delimited watch events.
//!
//! Each input line looks like `{"type": "ADDED", "object": {...}}`, as
//! produced by `kubectl get -o json --output-watch-events --watch`.

use std::fmt;

use serde_json::Value;

use super::error::EventError;

/// Kind of change a watch event reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    Added,
    Modified,
    Deleted,
    /// Any other type string, kept verbatim for display.
    Unknown(String),
}

impl EventType {
    /// Classify a raw type string. Matching is case-insensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("ADDED") {
            Self::Added
        } else if raw.eq_ignore_ascii_case("MODIFIED") {
            Self::Modified
        } else if raw.eq_ignore_ascii_case("DELETED") {
            Self::Deleted
        } else {
            Self::Unknown(raw.to_string())
        }
    }

    /// Upper-case label used when rendering.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Added => "ADDED",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One logical watch event: a type plus the object it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEvent {
    pub event_type: EventType,
    pub object: Value,
}

/// Decode one input line into its logical events.
///
/// List objects (`kind` ending in `List` with a non-empty `items` array) are
/// expanded into one event per item, each inheriting the outer type. Items
/// that carry no `kind` of their own get the list kind without the suffix.
///
/// # Errors
///
/// Returns an [`EventError`] when the line is not a JSON object or lacks a
/// string `type` or an `object` field.
pub fn decode_line(line: &str) -> Result<Vec<WatchEvent>, EventError> {
    let value: Value = serde_json::from_str(line)?;
    let Value::Object(mut fields) = value else {
        return Err(EventError::NotAnObject);
    };

    let event_type = match fields.get("type") {
        Some(Value::String(raw)) => EventType::parse(raw),
        _ => return Err(EventError::MissingField("type")),
    };
    let object = match fields.remove("object") {
        Some(Value::Null) | None => return Err(EventError::MissingField("object")),
        Some(object) => object,
    };

    Ok(expand_list(event_type, object))
}

fn expand_list(event_type: EventType, mut object: Value) -> Vec<WatchEvent> {
    let item_kind = object
        .get("kind")
        .and_then(Value::as_str)
        .and_then(|kind| kind.strip_suffix("List"))
        .map(str::to_string);

    let items = match (&item_kind, object.get_mut("items")) {
        (Some(_), Some(Value::Array(items))) if !items.is_empty() => std::mem::take(items),
        _ => return vec![WatchEvent { event_type, object }],
    };

    let list_kind = object.get("kind").and_then(Value::as_str).unwrap_or_default();
    tracing::debug!(
        list_kind,
        count = items.len(),
        "Expanding list object"
    );

    items
        .into_iter()
        .map(|mut item| {
            if let (Some(kind), Value::Object(map)) = (&item_kind, &mut item) {
                if !kind.is_empty() && !map.contains_key("kind") {
                    map.insert("kind".to_string(), Value::String(kind.clone()));
                }
            }
            WatchEvent {
                event_type: event_type.clone(),
                object: item,
            }
        })
        .collect()
}
