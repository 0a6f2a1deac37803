//! Classification and normalization of decoded watch events.

use std::fmt;

use serde_json::Value;

use super::decode::{EventType, WatchEvent};
use super::error::EventError;

/// Placeholder shown for cluster-scoped objects.
pub const NO_NAMESPACE: &str = "<no namespace>";
/// Placeholder shown for objects without a name.
pub const NO_NAME: &str = "<no name>";
/// Placeholder shown for payloads without a kind, such as watch `ERROR` statuses.
pub const NO_KIND: &str = "<no kind>";

/// Metadata fields that change on every API server write.
pub const VOLATILE_METADATA_FIELDS: [&str; 2] = ["managedFields", "resourceVersion"];

/// Stable key used to correlate successive events about one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectIdentity {
    /// `metadata.uid`, when present and non-empty.
    Uid(String),
    /// Fallback composite of kind, namespace and name.
    Composite {
        kind: String,
        namespace: String,
        name: String,
    },
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uid(uid) => f.write_str(uid),
            Self::Composite {
                kind,
                namespace,
                name,
            } => write!(f, "{kind}/{namespace}/{name}"),
        }
    }
}

/// Display identity of an object: `<kind> <namespace>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ObjectRef {
    /// Best-effort display fields, falling back to placeholders.
    #[must_use]
    pub fn describe(object: &Value) -> Self {
        Self {
            kind: str_at(object, &["kind"]).unwrap_or(NO_KIND).to_string(),
            namespace: str_at(object, &["metadata", "namespace"])
                .unwrap_or(NO_NAMESPACE)
                .to_string(),
            name: str_at(object, &["metadata", "name"])
                .unwrap_or(NO_NAME)
                .to_string(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// A watch event with its identity resolved and volatile fields stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent {
    pub event_type: EventType,
    pub reference: ObjectRef,
    pub identity: ObjectIdentity,
    /// The object with volatile metadata removed.
    pub object: Value,
}

/// Look up a non-empty string at `path`, treating anything else as absent.
#[must_use]
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Remove volatile metadata fields in place.
pub fn strip_volatile(object: &mut Value) {
    if let Some(metadata) = object.get_mut("metadata").and_then(Value::as_object_mut) {
        for field in VOLATILE_METADATA_FIELDS {
            metadata.remove(field);
        }
    }
}

/// Resolve display fields and identity for an event, normalizing its object.
///
/// # Errors
///
/// Returns [`EventError::MissingKind`] when `object.kind` is absent or not a
/// string.
pub fn classify(event: WatchEvent) -> Result<ClassifiedEvent, EventError> {
    let WatchEvent {
        event_type,
        mut object,
    } = event;

    if object.get("kind").and_then(Value::as_str).is_none() {
        return Err(EventError::MissingKind);
    }
    let reference = ObjectRef::describe(&object);

    let identity = match str_at(&object, &["metadata", "uid"]) {
        Some(uid) => ObjectIdentity::Uid(uid.to_string()),
        None => ObjectIdentity::Composite {
            kind: reference.kind.clone(),
            namespace: reference.namespace.clone(),
            name: reference.name.clone(),
        },
    };

    strip_volatile(&mut object);

    Ok(ClassifiedEvent {
        event_type,
        reference,
        identity,
        object,
    })
}
