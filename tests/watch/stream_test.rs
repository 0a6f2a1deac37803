//! Tests for the stream loop.

use std::io::Write;

use tokio::io::BufReader;
use watchdiff::config::WatchConfig;
use watchdiff::watch::{run, LineReader, Processor, WatchError};

use super::plain_config;

async fn run_input(input: &str, config: &WatchConfig) -> (Result<String, WatchError>, Processor) {
    let mut reader = LineReader::new(input.as_bytes(), config.max_line_bytes);
    let mut processor = Processor::new(config);
    let mut out = Vec::new();
    let result = run(&mut reader, &mut processor, &mut out).await;
    (
        result.map(|_| String::from_utf8(out).unwrap()),
        processor,
    )
}

#[tokio::test]
async fn stream_processes_lines_in_order() {
    let input = concat!(
        r#"{"type":"ADDED","object":{"kind":"Pod","metadata":{"namespace":"ns1","name":"p1","uid":"u1"}}}"#,
        "\n",
        "\n",
        r#"{"type":"DELETED","object":{"kind":"Pod","metadata":{"namespace":"ns1","name":"p1","uid":"u1"}}}"#,
        "\n",
    );
    let (result, processor) = run_input(input, &plain_config()).await;
    let output = result.unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ADDED Pod ns1/p1"));
    assert!(lines[1].contains("DELETED Pod ns1/p1"));
    assert_eq!(processor.stats().lines, 2);
}

#[tokio::test]
async fn stream_skips_malformed_lines() {
    let input = concat!(
        "garbage\n",
        r#"{"object":{"kind":"Pod"}}"#,
        "\n",
        r#"{"type":"ADDED","object":{"kind":"Pod","metadata":{"name":"ok","uid":"u"}}}"#,
        "\n",
    );
    let (result, processor) = run_input(input, &plain_config()).await;
    let output = result.unwrap();

    assert!(output.contains("skipping line 1"));
    assert!(output.contains("skipping line 2"));
    assert!(output.contains("ADDED Pod <no namespace>/ok"));
    assert_eq!(processor.stats().diagnostics, 2);
}

#[tokio::test]
async fn stream_rejects_oversized_line() {
    let config = WatchConfig {
        max_line_bytes: 32,
        ..plain_config()
    };
    let input = format!("{{\"type\":\"ADDED\",\"object\":{{\"kind\":\"{}\"}}}}\n", "K".repeat(64));
    let (result, _) = run_input(&input, &config).await;

    assert!(matches!(result, Err(WatchError::LineTooLong { line: 1, limit: 32 })));
}

#[tokio::test]
async fn stream_reads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"type":"ADDED","object":{{"kind":"Service","metadata":{{"namespace":"web","name":"api","uid":"s1"}}}}}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let handle = tokio::fs::File::open(file.path()).await.unwrap();
    let config = plain_config();
    let mut reader = LineReader::new(BufReader::new(handle), config.max_line_bytes);
    let mut processor = Processor::new(&config);
    let mut out = Vec::new();
    let stats = run(&mut reader, &mut processor, &mut out).await.unwrap();

    assert_eq!(stats.rendered, 1);
    assert!(String::from_utf8(out).unwrap().contains("ADDED Service web/api"));
}

#[tokio::test]
async fn stream_empty_input() {
    let (result, processor) = run_input("", &plain_config()).await;
    assert_eq!(result.unwrap(), "");
    assert_eq!(processor.stats(), Default::default());
}
