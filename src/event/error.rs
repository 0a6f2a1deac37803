//! Event decoding error types.

/// Errors that make a single input line unusable.
///
/// All of these are recoverable: the offending line is reported and the
/// stream carries on with the next one.
#[derive(thiserror::Error, Debug)]
pub enum EventError {
    /// The line is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The line is JSON but not an object.
    #[error("event is not a JSON object")]
    NotAnObject,

    /// A required top-level field is absent or has the wrong type.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The embedded object has no string `kind`.
    #[error("object has no string `kind`")]
    MissingKind,
}
