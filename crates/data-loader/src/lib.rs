//! # Data Loader Crate
//!
//! Loads the MovieLens 1M user and movie fact files into an in-memory
//! index and answers the lookups the recommendation loop needs.
//!
//! ## Main Components
//!
//! - **types**: Fact types (UserFacts, MovieFacts, ProfileFacts, FactIndex)
//! - **parser**: Parse the `::`-delimited .dat files
//! - **index**: Build the index from a dataset directory
//! - **error**: Error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::FactIndex;
//! use std::path::Path;
//!
//! let index = FactIndex::load_from_files(Path::new("data/ml-1m"))?;
//! let facts = index.get_all(1, &[1193, 661])?;
//! println!("{} watched {} movies", facts.user.age, facts.movie.len());
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{FactIndex, Gender, MovieFacts, MovieId, ProfileFacts, UserFacts, UserId};
