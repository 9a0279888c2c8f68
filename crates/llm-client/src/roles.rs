//! The six configured agent roles and their instruction texts.
//!
//! The instructions are configuration data: they pin each role's
//! behavioral contract (and in particular the JSON shapes the pipeline
//! parses), not the coordinator's logic.

use crate::agent::TextAgent;
use crate::backend::CompletionBackend;
use std::sync::Arc;

pub const FACT_FETCHER: &str = "\
You are an AI assistant. The user describes which user and which sequence of watched \
movies a recommendation should be built for. Determine the numeric user identifier and \
the ordered list of numeric movie identifiers mentioned in the request.

Output only a JSON object in the following format:

{
    \"user_id\": <number>,
    \"movie_sequence\": [<number>, <number>, ...]
}
";

pub const PROFILE_ANALYZER: &str = "\
You are an AI assistant tasked with analyzing a user's movie-watching preferences and \
demographic information. Output the analysis in JSON format, including the following fields:
{
    \"Demographic Analysis\": \"<Your analysis here>\",
    \"Genre Preference\": \"<Your analysis here>\",
    \"Year Preference\": \"<Your analysis here>\",
    \"Summary\": \"<Summary of the User's Movie-Watching Personality>\"
}
Only output the JSON object.
";

pub const RECOMMENDER: &str = "\
Using the user's preferences, recommend a list of movies that align with the user's tastes \
across multiple aspects. Follow these steps to create a well-rounded set of recommendations:
- Genre-Based Recommendations: Recommend 20 movies that align with the user's genre preferences.
- Year-Based Recommendations: Recommend 20 movies that fit the user's preferred era.
- Overall Profile-Based Recommendations: Recommend 20 movies that best align with the user's \
complete profile.
After generating the lists, rank all recommended movies from highest to lowest based on their \
overall fit with the user's profile and output the top 20 as a single JSON array of title \
strings:
[
    \"Movie Title 1\",
    \"Movie Title 2\",
    ...
]
Only output the JSON array.
";

pub const REVIEW_SIMULATOR: &str = "\
Assume you are the user who has watched each of the recommended movies. For each movie, write \
a personal and honest review that reflects your genuine thoughts and feelings. Adopt the \
user's voice and perspective, be honest and critical, and highlight both strengths and \
weaknesses.

Structure every review to cover exactly these aspects:
1. Plot and Storyline
2. Characters and Acting
3. Visual Effects and Cinematography
4. Themes and Messages
5. Personal Impact and Enjoyment

Provide the reviews as a JSON array with one object per movie:
[
    {
        \"movie_title\": \"<title>\",
        \"comments\": {
            \"Plot and Storyline\": \"<comment>\",
            \"Characters and Acting\": \"<comment>\",
            \"Visual Effects and Cinematography\": \"<comment>\",
            \"Themes and Messages\": \"<comment>\",
            \"Personal Impact and Enjoyment\": \"<comment>\"
        }
    }
]
Only output the JSON array.
";

pub const EVALUATOR: &str = "\
You are simulating the user. Evaluate the recommended movies based on the user's preferences \
and the review comments provided.

Scoring instructions:
- For each movie, start with a base score of 0.
- Add 1 point for each positive comment among the five review categories.
- Do not add points for neutral comments.
- Subtract 1 point for each negative comment. The minimum total score is 0.
- Be strict and critical. Do not give high scores unless justified by the comments.

Output only the list of evaluations as a valid JSON array:
[
    {
        \"movie_title\": \"<title>\",
        \"evaluation\": <score>
    }
]
Do not include any additional text or explanations.
";

pub const JUDGE: &str = "\
You are the judge agent. Based on the evaluations provided, remove movies that are rated \
not 5. Provide a list of movies to be removed. If all movies are rated 5, indicate that the \
process is complete.

Output your response in the following JSON format:

{
    \"movies_to_remove\": [\"<movie_title1>\", \"<movie_title2>\", ...],
    \"process_complete\": true/false
}

Only output the JSON object.
";

/// The six agents the refinement loop drives, sharing one backend.
#[derive(Clone)]
pub struct AgentSet {
    pub fact_fetcher: TextAgent,
    pub profile_analyzer: TextAgent,
    pub recommender: TextAgent,
    pub review_simulator: TextAgent,
    pub evaluator: TextAgent,
    pub judge: TextAgent,
}

impl AgentSet {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            fact_fetcher: TextAgent::new("fact_fetcher", FACT_FETCHER, backend.clone()),
            profile_analyzer: TextAgent::new("profile_analyzer", PROFILE_ANALYZER, backend.clone()),
            recommender: TextAgent::new("recommender", RECOMMENDER, backend.clone()),
            review_simulator: TextAgent::new("review_simulator", REVIEW_SIMULATOR, backend.clone()),
            evaluator: TextAgent::new("evaluator", EVALUATOR, backend.clone()),
            judge: TextAgent::new("judge", JUDGE, backend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CompletionError;
    use async_trait::async_trait;

    struct NullBackend;

    #[async_trait]
    impl CompletionBackend for NullBackend {
        async fn complete(
            &self,
            _instruction: &str,
            _payload: &str,
        ) -> std::result::Result<String, CompletionError> {
            Ok(String::new())
        }
    }

    #[test]
    fn agent_set_names() {
        let set = AgentSet::new(Arc::new(NullBackend));
        assert_eq!(set.fact_fetcher.name(), "fact_fetcher");
        assert_eq!(set.judge.name(), "judge");
    }

    #[test]
    fn instructions_pin_the_parsed_shapes() {
        // The pipeline depends on these field names appearing in the contracts.
        assert!(FACT_FETCHER.contains("movie_sequence"));
        assert!(REVIEW_SIMULATOR.contains("Personal Impact and Enjoyment"));
        assert!(EVALUATOR.contains("\"evaluation\""));
        assert!(JUDGE.contains("movies_to_remove"));
        assert!(JUDGE.contains("process_complete"));
    }
}
