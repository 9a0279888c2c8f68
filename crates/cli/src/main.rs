use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{FactIndex, MovieId, UserId};
use llm_client::{AgentSet, OpenAiCompatBackend};
use server::{RefinementLoop, RunOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// CineLoop - LLM-driven iterative movie recommendations
#[derive(Parser)]
#[command(name = "cine-loop")]
#[command(about = "Iteratively refines LLM movie recommendations for a MovieLens user", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-1m")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the refinement loop for a free-text query
    Recommend {
        /// Free-text query naming a user and their watched movies,
        /// e.g. "recommend movies for user 1 who watched movies 1193, 661 and 914"
        #[arg(long)]
        query: String,

        /// OpenAI-compatible endpoint base URL
        #[arg(long, default_value = "http://localhost:11434/v1")]
        base_url: String,

        /// Model name to request from the backend
        #[arg(long, default_value = "llama3")]
        model: String,

        /// Recommend->Review->Evaluate->Judge cycles to run
        #[arg(long, default_value = "3")]
        max_iterations: u32,
    },

    /// Show the stored facts for a user
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Show the stored facts for a movie
    Movie {
        /// Movie ID to display
        #[arg(long)]
        movie_id: MovieId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load the fact index (fast; two flat files)
    println!("Loading MovieLens facts from {}...", cli.data_dir.display());
    let start = Instant::now();
    let facts = Arc::new(
        FactIndex::load_from_files(&cli.data_dir).context("Failed to load MovieLens fact files")?,
    );
    println!("{} Loaded facts in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Recommend {
            query,
            base_url,
            model,
            max_iterations,
        } => handle_recommend(facts, query, base_url, model, max_iterations).await?,
        Commands::User { user_id } => handle_user(facts, user_id)?,
        Commands::Movie { movie_id } => handle_movie(facts, movie_id)?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    facts: Arc<FactIndex>,
    query: String,
    base_url: String,
    model: String,
    max_iterations: u32,
) -> Result<()> {
    // Key is optional for local backends like Ollama
    let api_key = std::env::var("LLM_API_KEY").unwrap_or_else(|_| "ollama".to_string());

    let backend = Arc::new(
        OpenAiCompatBackend::new(base_url, api_key, model)
            .context("Failed to build completion backend")?,
    );
    let refinement =
        RefinementLoop::new(facts, AgentSet::new(backend)).with_max_iterations(max_iterations);

    let outcome = refinement.run(&query).await;
    print_outcome(&outcome);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(facts: Arc<FactIndex>, user_id: UserId) -> Result<()> {
    let user = facts
        .get_user_facts(user_id)
        .context("User lookup failed")?;

    println!("{}", format!("User {}", user_id).bold().blue());
    println!("{}Gender: {:?}", "• ".green(), user.gender);
    println!("{}Age code: {}", "• ".green(), user.age);
    println!("{}Occupation code: {}", "• ".green(), user.occupation);
    Ok(())
}

/// Handle the 'movie' command
fn handle_movie(facts: Arc<FactIndex>, movie_id: MovieId) -> Result<()> {
    let movie = facts
        .get_movie_facts(movie_id)
        .context("Movie lookup failed")?;

    println!("{}", format!("Movie {}", movie_id).bold().blue());
    println!("{}Title: {}", "• ".green(), movie.title);
    println!("{}Genres: {}", "• ".green(), movie.genres.join(", "));
    Ok(())
}

/// Format and print the run outcome
fn print_outcome(outcome: &RunOutcome) {
    for result in &outcome.history {
        println!(
            "Iteration {}: average score {:.2} over {} movies",
            result.iteration,
            result.average_score,
            result.recommended_movies.len()
        );
    }

    if let Some(diagnostic) = &outcome.diagnostic {
        println!("{} {}", "Stopped early:".yellow(), diagnostic);
    }

    if outcome.no_recommendations() {
        println!("{}", "No recommendations were produced.".red());
        return;
    }

    if let Some(best) = outcome.best_iteration {
        println!(
            "{}",
            format!("Final movie list (from iteration {best}):")
                .bold()
                .blue()
        );
    }
    for (rank, title) in outcome.movies.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), title);
    }
}
