//! Watch stream tests.

mod scenarios_test;
mod stream_test;

use watchdiff::config::WatchConfig;

/// Config with colors off so output can be matched as plain text.
pub fn plain_config() -> WatchConfig {
    WatchConfig {
        color: false,
        ..Default::default()
    }
}

/// Verify the public watch API is exported from the library.
#[test]
fn test_watch_types_exported() {
    use watchdiff::diff::{DiffSegment, DiffStrategy, ObjectDiff, TokenDiff, UnifiedDiff};
    use watchdiff::event::{EventError, EventType, ObjectIdentity, ObjectRef};
    use watchdiff::store::ObjectStore;
    use watchdiff::watch::{LineReader, Processor, WatchError, WatchStats};

    let _ = Processor::new(&plain_config());
    let _ = ObjectStore::new();
    let _ = LineReader::new(&b""[..], 16);
    let _ = WatchStats::default();
    let _: Box<dyn DiffStrategy> = Box::new(TokenDiff::new(Default::default()));
    let _: Box<dyn DiffStrategy> = Box::new(UnifiedDiff::new(Default::default()));
    let _ = ObjectDiff::Tokens(vec![DiffSegment::Equal(String::new())]);
    let _ = EventType::Added;
    let _ = ObjectIdentity::Uid(String::new());
    let _ = ObjectRef {
        kind: String::new(),
        namespace: String::new(),
        name: String::new(),
    };
    let _: fn() -> EventError = || EventError::MissingKind;
    let _: fn() -> WatchError = || WatchError::LineTooLong { line: 1, limit: 1 };
}
