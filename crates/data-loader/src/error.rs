//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading or querying the fact files.
///
/// `UserNotFound`/`MovieNotFound` are lookup misses; the other variants
/// indicate a malformed row or an unreadable file.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a fact file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// No user row exists for the requested identifier
    #[error("User {0} not found")]
    UserNotFound(u32),

    /// No movie row exists for the requested identifier
    #[error("Movie {0} not found")]
    MovieNotFound(u32),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
