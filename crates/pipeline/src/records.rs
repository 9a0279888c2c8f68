//! Iteration data contracts and their parsers.
//!
//! Each parser takes a raw agent reply, runs the bracket extractor, and
//! converts the elements into typed records, distinguishing a bad JSON
//! region (`NoJson`/`InvalidJson`) from a well-formed region with the wrong
//! shape (`Shape`) and from a zero-length result (`Empty`).

use crate::error::{PipelineError, Result};
use crate::extract::{extract_array, extract_object};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One simulated review, keyed by the five fixed comment categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub movie_title: String,
    pub comments: BTreeMap<String, String>,
}

/// One scored movie, derived from its review by the evaluator agent.
///
/// The score is trusted as produced; an unsigned field makes a negative
/// score a shape failure instead of a silent clamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub movie_title: String,
    pub evaluation: u32,
}

/// The judge's verdict for one iteration.
///
/// Only shapes the next iteration's recommendation request; the final list
/// is never filtered by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemovalDecision {
    #[serde(default)]
    pub movies_to_remove: Vec<String>,
    #[serde(default)]
    pub process_complete: bool,
}

/// One completed iteration, as recorded in the loop's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationResult {
    /// 1-based iteration number
    pub iteration: u32,
    pub recommended_movies: Vec<String>,
    pub average_score: f64,
}

/// Parse a recommender reply into an ordered list of titles.
///
/// The order is the model's ranking and is preserved as-is.
pub fn parse_recommendations(text: &str) -> Result<Vec<String>> {
    let values = extract_array(text)?;
    let titles = values
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| PipelineError::Shape {
                reason: format!("recommendation entry is not a string: {v}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if titles.is_empty() {
        return Err(PipelineError::Empty {
            what: "recommended movie",
        });
    }
    Ok(titles)
}

/// Parse a review-simulator reply into review records.
pub fn parse_reviews(text: &str) -> Result<Vec<ReviewRecord>> {
    let values = extract_array(text)?;
    values
        .into_iter()
        .map(|v| {
            serde_json::from_value(v).map_err(|e| PipelineError::Shape {
                reason: format!("bad review record: {e}"),
            })
        })
        .collect()
}

/// Parse an evaluator reply into scored records.
///
/// Zero evaluations would make the iteration average undefined, so an
/// empty array fails here rather than downstream.
pub fn parse_evaluations(text: &str) -> Result<Vec<EvaluationRecord>> {
    let values = extract_array(text)?;
    let evaluations = values
        .into_iter()
        .map(|v| {
            serde_json::from_value(v).map_err(|e| PipelineError::Shape {
                reason: format!("bad evaluation record: {e}"),
            })
        })
        .collect::<Result<Vec<EvaluationRecord>>>()?;
    if evaluations.is_empty() {
        return Err(PipelineError::Empty { what: "evaluation" });
    }
    Ok(evaluations)
}

/// Parse a judge reply into a removal decision.
///
/// The raw reply is tried directly first; if it carries surrounding prose
/// the object extractor takes over. Absent fields fall back to defaults
/// (nothing to remove, not complete).
pub fn parse_removal_decision(text: &str) -> Result<RemovalDecision> {
    if let Ok(decision) = serde_json::from_str::<RemovalDecision>(text.trim()) {
        return Ok(decision);
    }
    let value = extract_object(text)?;
    serde_json::from_value(value).map_err(|e| PipelineError::Shape {
        reason: format!("bad removal decision: {e}"),
    })
}

/// Average of the evaluation scores for one iteration.
pub fn average_score(evaluations: &[EvaluationRecord]) -> Result<f64> {
    if evaluations.is_empty() {
        return Err(PipelineError::Empty { what: "evaluation" });
    }
    let total: u32 = evaluations.iter().map(|e| e.evaluation).sum();
    Ok(f64::from(total) / evaluations.len() as f64)
}

/// Pick the best-scoring iteration from the history.
///
/// Comparison is strictly-greater, so the earliest of tied iterations wins.
/// Returns `None` only for an empty history.
pub fn select_best(history: &[IterationResult]) -> Option<&IterationResult> {
    let mut best: Option<&IterationResult> = None;
    for result in history {
        match best {
            Some(current) if result.average_score <= current.average_score => {}
            _ => best = Some(result),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendations_preserve_order() {
        let reply = "Here you go: [\"Heat (1995)\", \"Alien (1979)\", \"Ran (1985)\"]";
        let titles = parse_recommendations(reply).unwrap();
        assert_eq!(titles, vec!["Heat (1995)", "Alien (1979)", "Ran (1985)"]);
    }

    #[test]
    fn recommendations_reject_non_strings() {
        let err = parse_recommendations("[\"ok\", 42]").unwrap_err();
        assert!(matches!(err, PipelineError::Shape { .. }));
    }

    #[test]
    fn recommendations_reject_empty_list() {
        let err = parse_recommendations("[]").unwrap_err();
        assert!(matches!(err, PipelineError::Empty { .. }));
    }

    #[test]
    fn reviews_parse_fixed_categories() {
        let reply = r#"[
            {
                "movie_title": "Heat (1995)",
                "comments": {
                    "Plot and Storyline": "Tense throughout.",
                    "Characters and Acting": "Two leads at their best.",
                    "Visual Effects and Cinematography": "The night scenes are striking.",
                    "Themes and Messages": "Obsession cuts both ways.",
                    "Personal Impact and Enjoyment": "Would watch again."
                }
            }
        ]"#;
        let reviews = parse_reviews(reply).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].movie_title, "Heat (1995)");
        assert_eq!(reviews[0].comments.len(), 5);
        assert!(reviews[0].comments.contains_key("Themes and Messages"));
    }

    #[test]
    fn reviews_missing_comments_is_shape_error() {
        let err = parse_reviews(r#"[{"movie_title": "Heat (1995)"}]"#).unwrap_err();
        assert!(matches!(err, PipelineError::Shape { .. }));
    }

    #[test]
    fn evaluations_parse() {
        let reply = r#"[
            {"movie_title": "A", "evaluation": 3},
            {"movie_title": "B", "evaluation": 0}
        ]"#;
        let evaluations = parse_evaluations(reply).unwrap();
        assert_eq!(evaluations[0].evaluation, 3);
        assert_eq!(evaluations[1].evaluation, 0);
    }

    #[test]
    fn evaluations_missing_score_is_shape_error() {
        let err = parse_evaluations(r#"[{"movie_title": "A"}]"#).unwrap_err();
        assert!(matches!(err, PipelineError::Shape { .. }));
    }

    #[test]
    fn evaluations_negative_score_is_shape_error() {
        let err = parse_evaluations(r#"[{"movie_title": "A", "evaluation": -1}]"#).unwrap_err();
        assert!(matches!(err, PipelineError::Shape { .. }));
    }

    #[test]
    fn evaluations_empty_is_empty_error() {
        let err = parse_evaluations("[]").unwrap_err();
        assert!(matches!(err, PipelineError::Empty { .. }));
    }

    #[test]
    fn removal_decision_direct_json() {
        let reply = r#"{"movies_to_remove": ["A", "B"], "process_complete": false}"#;
        let decision = parse_removal_decision(reply).unwrap();
        assert_eq!(decision.movies_to_remove, vec!["A", "B"]);
        assert!(!decision.process_complete);
    }

    #[test]
    fn removal_decision_with_prose_falls_back_to_extraction() {
        let reply = "Done judging.\n{\"movies_to_remove\": [], \"process_complete\": true}\nBye.";
        let decision = parse_removal_decision(reply).unwrap();
        assert!(decision.process_complete);
        assert!(decision.movies_to_remove.is_empty());
    }

    #[test]
    fn removal_decision_defaults_absent_fields() {
        let decision = parse_removal_decision("{}").unwrap();
        assert_eq!(decision, RemovalDecision::default());
    }

    #[test]
    fn removal_decision_no_object_is_no_json() {
        let err = parse_removal_decision("everything is fine").unwrap_err();
        assert!(matches!(err, PipelineError::NoJson));
    }

    #[test]
    fn average_of_three_and_zero_is_one_point_five() {
        let evaluations = vec![
            EvaluationRecord {
                movie_title: "A".into(),
                evaluation: 3,
            },
            EvaluationRecord {
                movie_title: "B".into(),
                evaluation: 0,
            },
        ];
        assert_eq!(average_score(&evaluations).unwrap(), 1.5);
    }

    #[test]
    fn average_of_empty_is_error() {
        let err = average_score(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Empty { .. }));
    }

    fn result(iteration: u32, average_score: f64) -> IterationResult {
        IterationResult {
            iteration,
            recommended_movies: vec![format!("movie-{iteration}")],
            average_score,
        }
    }

    #[test]
    fn select_best_picks_highest_average() {
        let history = vec![result(1, 1.0), result(2, 3.0), result(3, 2.0)];
        assert_eq!(select_best(&history).unwrap().iteration, 2);
    }

    #[test]
    fn select_best_breaks_ties_by_earliest() {
        let history = vec![result(1, 2.0), result(2, 2.0)];
        assert_eq!(select_best(&history).unwrap().iteration, 1);
    }

    #[test]
    fn select_best_of_empty_history_is_none() {
        assert!(select_best(&[]).is_none());
    }
}
