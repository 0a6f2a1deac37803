//! End-to-end event scenarios through the processor.

use chrono::{DateTime, Local, TimeZone};
use serde_json::json;
use watchdiff::canonical::to_canonical;
use watchdiff::config::{ContextLines, DiffMode, WatchConfig};
use watchdiff::event::ObjectIdentity;
use watchdiff::watch::Processor;

use super::plain_config;

const ADDED_POD: &str =
    r#"{"type":"ADDED","object":{"kind":"Pod","metadata":{"namespace":"ns1","name":"p1","uid":"u1"}}}"#;
const MODIFIED_POD: &str = r#"{"type":"MODIFIED","object":{"kind":"Pod","metadata":{"namespace":"ns1","name":"p1","uid":"u1","labels":{"x":"1"}}}}"#;

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
}

fn feed(processor: &mut Processor, lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(i, line)| processor.handle_line(i as u64 + 1, line, &now()).unwrap())
        .collect()
}

#[test]
fn added_event_renders_identity() {
    let mut processor = Processor::new(&plain_config());
    let out = feed(&mut processor, &[ADDED_POD]);

    assert_eq!(out.len(), 1);
    assert!(out[0].contains("ADDED Pod ns1/p1"), "got: {}", out[0]);
}

#[test]
fn added_event_stores_canonical_object() {
    let mut processor = Processor::new(&plain_config());
    feed(&mut processor, &[ADDED_POD]);

    let object = json!({"kind": "Pod", "metadata": {"namespace": "ns1", "name": "p1", "uid": "u1"}});
    assert_eq!(processor.store().len(), 1);
    assert_eq!(
        processor.store().get(&ObjectIdentity::Uid("u1".to_string())),
        Some(to_canonical(&object).unwrap().as_str())
    );
}

#[test]
fn modified_event_shows_inserted_labels() {
    let config = WatchConfig {
        no_ellipsis: true,
        ..plain_config()
    };
    let mut processor = Processor::new(&config);
    let out = feed(&mut processor, &[ADDED_POD, MODIFIED_POD]);

    assert_eq!(out.len(), 2);
    let modified = &out[1];
    assert!(modified.contains("MODIFIED Pod ns1/p1"), "got: {modified}");
    assert!(modified.contains("{+"), "got: {modified}");
    assert!(modified.contains("\"x\": \"1\""), "got: {modified}");
    assert!(modified.contains("labels"), "got: {modified}");
}

#[test]
fn modified_event_unified_mode() {
    let config = WatchConfig {
        diff_mode: DiffMode::Unified,
        context_lines: ContextLines::Lines(1),
        ..plain_config()
    };
    let mut processor = Processor::new(&config);
    let out = feed(&mut processor, &[ADDED_POD, MODIFIED_POD]);

    let lines: Vec<&str> = out[1].lines().collect();
    assert!(lines[0].ends_with("MODIFIED Pod ns1/p1"));
    assert!(lines[1].starts_with("@@ "));
    assert!(lines.contains(&"+    \"labels\": {"));
    assert!(lines.contains(&"+      \"x\": \"1\""));
    assert!(!lines.iter().any(|l| l.starts_with('-')));
}

#[test]
fn modified_scalar_change_marks_old_and_new() {
    let config = WatchConfig {
        no_ellipsis: true,
        ..plain_config()
    };
    let mut processor = Processor::new(&config);
    let before = r#"{"type":"ADDED","object":{"kind":"ConfigMap","metadata":{"name":"cm","namespace":"d","uid":"c1"},"data":{"color":"red"}}}"#;
    let after = r#"{"type":"MODIFIED","object":{"kind":"ConfigMap","metadata":{"name":"cm","namespace":"d","uid":"c1"},"data":{"color":"blue"}}}"#;
    let out = feed(&mut processor, &[before, after]);

    let modified = &out[1];
    assert!(modified.contains("[-"), "got: {modified}");
    assert!(modified.contains("{+"), "got: {modified}");
    // Reassembling each side recovers the original values.
    let old_side = modified.replace("[-", "").replace("-]", "");
    let old_side = strip_insertions(&old_side);
    assert!(old_side.contains("\"color\": \"red\""), "got: {old_side}");
}

fn strip_insertions(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some(start) = rest.find("{+") {
        out.push_str(&rest[..start]);
        match rest[start..].find("+}") {
            Some(end) => rest = &rest[start + end + 2..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[test]
fn churn_only_modification_is_silent() {
    let mut processor = Processor::new(&plain_config());
    let churn = r#"{"type":"MODIFIED","object":{"metadata":{"uid":"u1","resourceVersion":"42","name":"p1","namespace":"ns1","managedFields":[{"manager":"kubelet"}]},"kind":"Pod"}}"#;
    let out = feed(&mut processor, &[ADDED_POD, churn]);

    assert_eq!(out.len(), 1);
    assert_eq!(processor.stats().suppressed, 1);
}

#[test]
fn deleted_unknown_object_renders() {
    let mut processor = Processor::new(&plain_config());
    let deleted = r#"{"type":"DELETED","object":{"kind":"Secret","metadata":{"namespace":"kube-system","name":"token","uid":"s9"}}}"#;
    let out = feed(&mut processor, &[deleted]);

    assert_eq!(out.len(), 1);
    assert!(out[0].contains("DELETED Secret kube-system/token"));
    assert!(processor.store().is_empty());
}

#[test]
fn list_event_expands_into_items() {
    let mut processor = Processor::new(&plain_config());
    let list = json!({
        "type": "ADDED",
        "object": {
            "kind": "PodList",
            "items": [
                {"kind": "Pod", "metadata": {"namespace": "ns1", "name": "a", "uid": "ua"}},
                {"kind": "Pod", "metadata": {"namespace": "ns1", "name": "b", "uid": "ub"}}
            ]
        }
    })
    .to_string();
    let out = feed(&mut processor, &[&list]);

    assert_eq!(out.len(), 2);
    assert!(out[0].contains("ADDED Pod ns1/a"));
    assert!(out[1].contains("ADDED Pod ns1/b"));
    assert_eq!(processor.store().len(), 2);
}

#[test]
fn same_event_renders_identically_from_same_state() {
    let mut first = Processor::new(&plain_config());
    feed(&mut first, &[ADDED_POD]);
    let mut second = first.clone();

    let a = feed(&mut first, &[MODIFIED_POD]);
    let b = feed(&mut second, &[MODIFIED_POD]);

    assert_eq!(a.len(), 1);
    assert_eq!(a, b);
    let uid = ObjectIdentity::Uid("u1".to_string());
    assert_eq!(first.store().get(&uid), second.store().get(&uid));
}

#[test]
fn cluster_scoped_object_without_uid() {
    let mut processor = Processor::new(&plain_config());
    let added = r#"{"type":"ADDED","object":{"kind":"Node","metadata":{"name":"worker-1"},"spec":{"unschedulable":false}}}"#;
    let modified = r#"{"type":"MODIFIED","object":{"kind":"Node","metadata":{"name":"worker-1"},"spec":{"unschedulable":true}}}"#;
    let out = feed(&mut processor, &[added, modified]);

    assert!(out[0].contains("ADDED Node <no namespace>/worker-1"));
    assert!(out[1].contains("MODIFIED Node <no namespace>/worker-1"));
    assert!(out[1].contains("[-"));
}

#[test]
fn reappearing_object_is_diffed_against_last_state() {
    let mut processor = Processor::new(&plain_config());
    let deleted = r#"{"type":"DELETED","object":{"kind":"Pod","metadata":{"namespace":"ns1","name":"p1","uid":"u1"}}}"#;
    let out = feed(&mut processor, &[ADDED_POD, deleted, MODIFIED_POD]);

    assert_eq!(out.len(), 3);
    assert!(out[2].contains("MODIFIED Pod ns1/p1"));
}

#[test]
fn colored_output_uses_ansi() {
    let mut processor = Processor::new(&WatchConfig::default());
    let out = feed(&mut processor, &[ADDED_POD]);
    assert!(out[0].contains("\u{1b}["));
    assert!(out[0].contains("Pod ns1/p1"));
}
