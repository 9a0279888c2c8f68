//! # Refinement Loop
//!
//! The coordinator that drives the whole pipeline:
//! 1. Resolve the free-text query into a user id and watch sequence
//! 2. Fetch user and movie facts
//! 3. Synthesize the preference profile (once per run)
//! 4. Loop Recommend -> Review -> Evaluate -> Judge, at most `max_iterations`
//! 5. Select the best-scoring iteration as the final answer
//!
//! Steps are strictly sequential: every payload embeds the previous step's
//! parsed output. The profile and the iteration history are written only
//! here and only appended to.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use data_loader::{FactIndex, MovieId, ProfileFacts, UserId};
use llm_client::AgentSet;
use pipeline::{
    average_score, parse_evaluations, parse_recommendations, parse_removal_decision,
    parse_reviews, select_best, EvaluationRecord, IterationResult, RemovalDecision, ReviewRecord,
};

/// Recommend->Review->Evaluate->Judge cycles per run.
const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// The fact-fetcher agent's parsed reply: which user and which watch
/// sequence the run is about.
#[derive(Debug, Deserialize)]
struct WatchQuery {
    user_id: UserId,
    movie_sequence: Vec<MovieId>,
}

/// Terminal result of one run.
///
/// A run never surfaces an error: any failure terminates it early and
/// lands in `diagnostic`, and selection still runs over whatever history
/// the completed iterations accumulated.
#[derive(Debug)]
pub struct RunOutcome {
    /// The best iteration's recommended titles; empty when no iteration completed
    pub movies: Vec<String>,
    /// Which iteration `movies` came from
    pub best_iteration: Option<u32>,
    /// All completed iterations, in order
    pub history: Vec<IterationResult>,
    /// Why the run stopped early, if it did
    pub diagnostic: Option<String>,
}

impl RunOutcome {
    /// True when the run terminated without a single usable iteration.
    pub fn no_recommendations(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Main coordinator for the refinement pipeline.
pub struct RefinementLoop {
    facts: Arc<FactIndex>,
    agents: AgentSet,
    max_iterations: u32,
}

impl RefinementLoop {
    pub fn new(facts: Arc<FactIndex>, agents: AgentSet) -> Self {
        Self {
            facts,
            agents,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration cap (mainly for tests).
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run the full pipeline for one free-text query.
    pub async fn run(&self, query: &str) -> RunOutcome {
        let mut history = Vec::new();

        let diagnostic = match self.drive(query, &mut history).await {
            Ok(judge_diagnostic) => judge_diagnostic,
            Err(e) => {
                error!("Refinement loop aborted: {e:#}");
                Some(format!("{e:#}"))
            }
        };

        // Selecting
        match select_best(&history) {
            Some(best) => {
                info!(
                    iteration = best.iteration,
                    average_score = best.average_score,
                    "Selected best iteration"
                );
                let movies = best.recommended_movies.clone();
                let best_iteration = Some(best.iteration);
                RunOutcome {
                    movies,
                    best_iteration,
                    history,
                    diagnostic,
                }
            }
            None => {
                warn!("No recommendations were produced");
                RunOutcome {
                    movies: Vec::new(),
                    best_iteration: None,
                    history,
                    diagnostic,
                }
            }
        }
    }

    /// Execute every stage up to selection.
    ///
    /// Hard failures (anything before the judge) are `Err` and discard the
    /// in-flight iteration. A judge failure is tolerated: the iteration's
    /// already-recorded result stays in `history` and the loop stops with a
    /// diagnostic in `Ok(Some(_))`.
    async fn drive(
        &self,
        query: &str,
        history: &mut Vec<IterationResult>,
    ) -> Result<Option<String>> {
        let watch = self.resolve_query(query).await?;
        info!(
            user_id = watch.user_id,
            movies = watch.movie_sequence.len(),
            "Resolved watch query"
        );

        let facts = self
            .facts
            .get_all(watch.user_id, &watch.movie_sequence)
            .context("Fact lookup failed")?;

        let profile = self.analyze_profile(&facts).await?;
        info!(profile_len = profile.len(), "Preference profile ready");

        let mut movies_to_remove: Vec<String> = Vec::new();

        for iteration in 1..=self.max_iterations {
            info!(iteration, "Starting iteration");

            // Recommending
            let recommended = self.recommend(&profile, &movies_to_remove).await?;
            info!(iteration, count = recommended.len(), "Recommendations parsed");

            // Reviewing
            let reviews = self.simulate_reviews(&profile, &recommended).await?;
            info!(iteration, count = reviews.len(), "Reviews parsed");

            // Evaluating
            let evaluations = self.evaluate(&reviews).await?;
            let average = average_score(&evaluations).context("Averaging evaluations failed")?;
            info!(iteration, average_score = average, "Iteration scored");

            history.push(IterationResult {
                iteration,
                recommended_movies: recommended,
                average_score: average,
            });

            // Judging -- a failure here keeps the result recorded above
            match self.judge(&evaluations).await {
                Ok(decision) => {
                    if decision.process_complete {
                        // Informational only; the loop always runs to the cap
                        info!(iteration, "Judge reports the process complete");
                    }
                    info!(
                        iteration,
                        to_remove = decision.movies_to_remove.len(),
                        "Judge verdict parsed"
                    );
                    movies_to_remove = decision.movies_to_remove;
                }
                Err(e) => {
                    warn!(iteration, "Judge step failed, stopping: {e:#}");
                    return Ok(Some(format!("Judge step failed: {e:#}")));
                }
            }
        }

        Ok(None)
    }

    /// Ask the fact-fetcher agent which user and movies the query is about.
    async fn resolve_query(&self, query: &str) -> Result<WatchQuery> {
        let reply = self
            .agents
            .fact_fetcher
            .respond(query)
            .await
            .context("FactFetcher call failed")?;
        let value =
            pipeline::extract_object(&reply).context("No watch query in FactFetcher reply")?;
        serde_json::from_value(value).context("Bad watch query shape")
    }

    /// One-time profile synthesis; the raw reply is reused verbatim in
    /// every later request.
    async fn analyze_profile(&self, facts: &ProfileFacts) -> Result<String> {
        let facts_json =
            serde_json::to_string_pretty(facts).context("Serializing profile facts")?;
        let payload = format!(
            "Here is the user's demographic information and movie-watching history:\n{facts_json}"
        );
        self.agents
            .profile_analyzer
            .respond(&payload)
            .await
            .context("ProfileAnalyzer call failed")
    }

    async fn recommend(&self, profile: &str, movies_to_remove: &[String]) -> Result<Vec<String>> {
        let payload = if movies_to_remove.is_empty() {
            format!(
                "Based on the analysis results: {profile}\n\
                 Recommend the top 20 movies that best align with the user's preferences. \
                 Only provide the movie names in a JSON list."
            )
        } else {
            let titles = serde_json::Value::from(movies_to_remove.to_vec()).to_string();
            format!(
                "Based on the analysis results: {profile}\n\
                 Remove the following movies from the recommendation list and replace them \
                 with new recommendations to maintain a list of 20 movies.\n\
                 Movies to remove: {titles}\n\
                 Only provide the movie names in a JSON list."
            )
        };
        let reply = self
            .agents
            .recommender
            .respond(&payload)
            .await
            .context("Recommender call failed")?;
        parse_recommendations(&reply).context("Parsing recommendations failed")
    }

    async fn simulate_reviews(
        &self,
        profile: &str,
        recommended: &[String],
    ) -> Result<Vec<ReviewRecord>> {
        let titles = serde_json::Value::from(recommended.to_vec()).to_string();
        let payload = format!(
            "Based on the user's analysis results:\n{profile}\n\n\
             Suppose you are such a user and here are some movies you've watched:\n{titles}\n\n\
             Generate honest and critical comments for each movie as per the system message."
        );
        let reply = self
            .agents
            .review_simulator
            .respond(&payload)
            .await
            .context("ReviewSimulator call failed")?;
        parse_reviews(&reply).context("Parsing reviews failed")
    }

    async fn evaluate(&self, reviews: &[ReviewRecord]) -> Result<Vec<EvaluationRecord>> {
        let reviews_json = serde_json::to_string(reviews).context("Serializing reviews")?;
        let payload = format!(
            "Here are the comments for the recommended movies:\n{reviews_json}\n\n\
             Evaluate these movies from the user's perspective based on the comments provided, \
             and follow the scoring instructions in your system message."
        );
        let reply = self
            .agents
            .evaluator
            .respond(&payload)
            .await
            .context("Evaluator call failed")?;
        parse_evaluations(&reply).context("Parsing evaluations failed")
    }

    async fn judge(&self, evaluations: &[EvaluationRecord]) -> Result<RemovalDecision> {
        let evaluations_json =
            serde_json::to_string(evaluations).context("Serializing evaluations")?;
        let payload = format!(
            "Here are the evaluations:\n{evaluations_json}\n\n\
             As per your instructions, remove movies that are rated not 5."
        );
        let reply = self
            .agents
            .judge
            .respond(&payload)
            .await
            .context("Judge call failed")?;
        parse_removal_decision(&reply).context("Parsing removal decision failed")
    }
}
