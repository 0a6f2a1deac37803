//! Canonical serialization of loosely-typed JSON objects.
//!
//! The canonical form sorts every map's keys lexicographically and is
//! pretty-printed with a two-space indent, so the same object always yields
//! the same bytes no matter how the source ordered its fields.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Indent used by [`reindent`] when formatted output is requested.
pub const WIDE_INDENT: &[u8] = b"    ";

/// Borrowing view of a [`Value`] that serializes map keys in sorted order.
struct Sorted<'a>(&'a Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let sorted: BTreeMap<&str, Sorted<'_>> =
                    map.iter().map(|(k, v)| (k.as_str(), Sorted(v))).collect();
                sorted.serialize(serializer)
            }
            Value::Array(items) => serializer.collect_seq(items.iter().map(Sorted)),
            other => other.serialize(serializer),
        }
    }
}

/// Serialize a value into its canonical, key-sorted, pretty-printed form.
///
/// # Errors
///
/// Returns an error only if the value cannot be serialized, which does not
/// happen for values parsed from valid JSON.
pub fn to_canonical(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Sorted(value))
}

/// Re-render a canonical serialization with a different indent.
///
/// # Errors
///
/// Returns an error if `canonical` is not valid JSON.
pub fn reindent(canonical: &str, indent: &[u8]) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(canonical)?;
    let mut buf = Vec::with_capacity(canonical.len() + canonical.len() / 2);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    Sorted(&value).serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}
