//! The completion capability consumed by every agent.
//!
//! A backend is a single fallible text-completion call; it carries no
//! conversation state between calls. Retrying is deliberately left to
//! nobody: a failed call is terminal for the coordinator step that made it.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a single completion round trip.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Network or connection-level failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The call did not complete within the configured deadline
    #[error("Completion request timed out")]
    Timeout,

    /// The backend answered, but with an error or an unusable body
    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CompletionError>;

/// An opaque text-completion capability.
///
/// `instruction` is the role's fixed behavioral contract; `payload` is the
/// caller-supplied content for this one exchange. Implementations must not
/// keep memory across calls beyond what the caller re-supplies.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, instruction: &str, payload: &str) -> Result<String>;
}
