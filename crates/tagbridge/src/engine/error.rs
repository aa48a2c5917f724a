//! Error types for the conversion engine.

use thiserror::Error;

/// A fatal conversion failure.
///
/// Data problems in the document are never fatal; they are reported as
/// [`crate::ValidationError`]s. This error means the element sequence itself
/// breaks the invariants the tokenizer guarantees, which is a bug in the
/// caller that built it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// An element is internally inconsistent.
    #[error("element {index} is malformed: {reason}")]
    MalformedElement { index: usize, reason: String },
}
