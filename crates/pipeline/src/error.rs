//! Error types for reply parsing and score aggregation.

use thiserror::Error;

/// Failures turning a free-form agent reply into structured records.
///
/// `NoJson`/`InvalidJson` mean the reply had no usable bracketed region;
/// `Shape` means the JSON parsed but lacked a required field; `Empty` means
/// a step that needs at least one record got zero.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No `[`/`{` bracketed region exists in the reply
    #[error("No JSON region found in reply")]
    NoJson,

    /// A bracketed region exists but is not valid JSON
    #[error("Extracted region is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON parsed but a record is missing or mistyping a field
    #[error("Unexpected record shape: {reason}")]
    Shape { reason: String },

    /// Zero records where at least one is required
    #[error("Empty result: expected at least one {what}")]
    Empty { what: &'static str },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
