//! Stream-level error types.

/// Errors that terminate a watch stream.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input line exceeded the configured byte limit.
    #[error("Input line {line} exceeds the {limit} byte limit")]
    LineTooLong { line: u64, limit: usize },

    /// An object could not be re-serialized.
    #[error("Failed to serialize object: {0}")]
    Serialize(#[from] serde_json::Error),
}
