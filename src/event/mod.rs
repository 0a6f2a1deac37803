//! Watch event decoding and classification.

mod classifier;
mod decode;
mod error;

pub use classifier::*;
pub use decode::*;
pub use error::EventError;
