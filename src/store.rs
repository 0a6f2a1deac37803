//! In-memory store of the last canonical serialization seen per object.

use std::collections::HashMap;

use crate::event::ObjectIdentity;

/// Maps object identities to their last canonical serialization.
///
/// Entries live for the whole process; nothing is ever evicted, so an object
/// that is deleted and later re-added is diffed against its last known state.
#[derive(Debug, Default, Clone)]
pub struct ObjectStore {
    entries: HashMap<ObjectIdentity, String>,
}

impl ObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, identity: &ObjectIdentity) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Record the latest serialization, returning the one it replaces.
    pub fn insert(&mut self, identity: ObjectIdentity, canonical: String) -> Option<String> {
        tracing::trace!(%identity, bytes = canonical.len(), "Storing object state");
        self.entries.insert(identity, canonical)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
