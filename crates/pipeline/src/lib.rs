//! # Pipeline Crate
//!
//! The data contracts between the refinement loop and its agents: JSON
//! extraction from free-form replies, typed record parsing, score
//! averaging and best-iteration selection. Everything here is pure and
//! synchronous; the coordinator decides what a failure means.

pub mod error;
pub mod extract;
pub mod records;

pub use error::{PipelineError, Result};
pub use extract::{extract_array, extract_object};
pub use records::{
    average_score, parse_evaluations, parse_recommendations, parse_removal_decision,
    parse_reviews, select_best, EvaluationRecord, IterationResult, RemovalDecision, ReviewRecord,
};
