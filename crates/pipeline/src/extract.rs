//! JSON extraction from free-form agent replies.
//!
//! Agents are asked to answer with pure JSON, but in practice replies come
//! wrapped in prose or code fences. The contract here mirrors a DOTALL
//! `\[.*\]` search: take the region from the first opening bracket to the
//! last matching closing bracket, newlines included, and parse that.

use crate::error::{PipelineError, Result};
use serde_json::Value;

/// Slice the candidate JSON region out of a reply.
///
/// Brackets are ASCII, so the byte indices from `find`/`rfind` are always
/// valid char boundaries.
fn extract_region(text: &str, open: char, close: char) -> Result<&str> {
    let start = text.find(open).ok_or(PipelineError::NoJson)?;
    let end = text.rfind(close).ok_or(PipelineError::NoJson)?;
    if end < start {
        return Err(PipelineError::NoJson);
    }
    Ok(&text[start..=end])
}

/// Extract and parse the JSON array embedded in a reply.
///
/// Shape validation of the elements is the caller's responsibility.
pub fn extract_array(text: &str) -> Result<Vec<Value>> {
    let region = extract_region(text, '[', ']')?;
    Ok(serde_json::from_str(region)?)
}

/// Extract and parse the JSON object embedded in a reply.
pub fn extract_object(text: &str) -> Result<Value> {
    let region = extract_region(text, '{', '}')?;
    let value: Value = serde_json::from_str(region)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_with_surrounding_prose() {
        let reply = "Sure! Here are the movies:\n```json\n[\"Alien (1979)\", \"Heat (1995)\"]\n```\nEnjoy!";
        let values = extract_array(reply).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "Alien (1979)");
    }

    #[test]
    fn array_spanning_newlines() {
        let reply = "[\n  {\"movie_title\": \"Heat (1995)\",\n   \"evaluation\": 4}\n]";
        let values = extract_array(reply).unwrap();
        assert_eq!(values[0]["evaluation"], 4);
    }

    #[test]
    fn region_equals_minimal_bracket_span() {
        // First `[` to its matching last `]` -- byte-for-byte the same parse
        let reply = "noise [1, [2, 3], 4] trailing";
        let values = extract_array(reply).unwrap();
        assert_eq!(values, vec![Value::from(1), serde_json::json!([2, 3]), Value::from(4)]);
    }

    #[test]
    fn no_brackets_is_no_json() {
        let err = extract_array("I could not produce a list, sorry.").unwrap_err();
        assert!(matches!(err, PipelineError::NoJson));
    }

    #[test]
    fn close_before_open_is_no_json() {
        let err = extract_array("] oops [").unwrap_err();
        assert!(matches!(err, PipelineError::NoJson));
    }

    #[test]
    fn unbalanced_quotes_are_invalid_json() {
        let err = extract_array("[\"unterminated]").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidJson(_)));
    }

    #[test]
    fn object_with_prose() {
        let reply = "Verdict below.\n{\"movies_to_remove\": [\"Heat (1995)\"], \"process_complete\": false}";
        let value = extract_object(reply).unwrap();
        assert_eq!(value["process_complete"], false);
    }

    #[test]
    fn object_missing_is_no_json() {
        let err = extract_object("all good").unwrap_err();
        assert!(matches!(err, PipelineError::NoJson));
    }
}
