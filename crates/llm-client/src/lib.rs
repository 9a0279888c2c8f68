//! # LLM Client Crate
//!
//! The completion capability behind the recommendation loop's agents.
//! It provides:
//! - The `CompletionBackend` trait: one fallible text-completion round trip
//! - An OpenAI-compatible HTTP implementation
//! - `TextAgent`: a role instruction bound to a backend
//! - `AgentSet`: the six configured roles the loop drives

pub mod agent;
pub mod backend;
pub mod openai;
pub mod roles;

pub use agent::TextAgent;
pub use backend::{CompletionBackend, CompletionError, Result};
pub use openai::OpenAiCompatBackend;
pub use roles::AgentSet;
