//! Server crate for the CineLoop recommendation pipeline.
//!
//! This crate contains the refinement loop that coordinates the fact
//! lookups and the six agents, owns the iteration history and picks the
//! final recommendation list.

pub mod orchestrator;

pub use orchestrator::{RefinementLoop, RunOutcome};
