//! Configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default per-line byte limit for the input stream (64 MiB).
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024 * 1024;

/// Default number of context lines in unified diffs.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// How MODIFIED events are diffed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Inline insert/delete spans over the raw text.
    #[default]
    Token,
    /// Line-oriented unified diff with context.
    Unified,
}

impl FromStr for DiffMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "unified" => Ok(Self::Unified),
            other => Err(format!("unknown diff mode `{other}` (expected token or unified)")),
        }
    }
}

/// Unit the token diff operates on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Chars,
    Words,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chars" => Ok(Self::Chars),
            "words" => Ok(Self::Words),
            other => Err(format!("unknown granularity `{other}` (expected chars or words)")),
        }
    }
}

/// Context around changes in unified diffs.
///
/// Serialized as an integer where `-1` selects the whole object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ContextLines {
    Lines(usize),
    Whole,
}

impl Default for ContextLines {
    fn default() -> Self {
        Self::Lines(DEFAULT_CONTEXT_LINES)
    }
}

impl TryFrom<i64> for ContextLines {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Whole),
            n => usize::try_from(n)
                .map(Self::Lines)
                .map_err(|_| format!("invalid context line count {n} (use -1 for whole object)")),
        }
    }
}

impl From<ContextLines> for i64 {
    fn from(value: ContextLines) -> Self {
        match value {
            ContextLines::Whole => -1,
            ContextLines::Lines(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

impl FromStr for ContextLines {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid context line count `{s}`: {e}"))?;
        Self::try_from(n)
    }
}

impl fmt::Display for ContextLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => f.write_str("whole"),
            Self::Lines(n) => write!(f, "{n}"),
        }
    }
}

/// Configuration for the watch-changes renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Re-indent both sides with a wider indent before diffing.
    pub pretty_before_diff: bool,
    /// Keep long unchanged spans intact instead of eliding them.
    pub no_ellipsis: bool,
    /// Print the full object body on ADDED events.
    pub body_on_added: bool,
    /// Diff strategy for MODIFIED events.
    pub diff_mode: DiffMode,
    /// Context lines for unified diffs.
    pub context_lines: ContextLines,
    /// Token diff granularity.
    pub granularity: Granularity,
    /// Emit ANSI colors.
    pub color: bool,
    /// Longest accepted input line in bytes.
    pub max_line_bytes: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            pretty_before_diff: false,
            no_ellipsis: false,
            body_on_added: false,
            diff_mode: DiffMode::default(),
            context_lines: ContextLines::default(),
            granularity: Granularity::default(),
            color: true,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}
