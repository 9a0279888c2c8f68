//! Core fact types extracted from the MovieLens 1M dataset.
//!
//! These structs are the payload the agents reason about, so they derive
//! `Serialize` and get turned into JSON before being sent downstream.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a user (1-6040 in MovieLens 1M)
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Gender as recorded in users.dat.
///
/// The dataset only uses `F` and `M`; any other code is kept as `Unknown`
/// rather than rejecting the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

/// Demographic facts for a single user.
///
/// `age` and `occupation` are kept as the raw dataset codes; interpreting
/// them is left to the profile-analysis agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacts {
    pub gender: Gender,
    pub age: u32,
    pub occupation: u32,
}

/// Metadata for a single movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFacts {
    pub title: String,
    /// Genres in the order they appear in movies.dat
    pub genres: Vec<String>,
}

/// Combined lookup result for one user plus their watch sequence.
///
/// Serialized as-is into the profile-analysis request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFacts {
    pub user: UserFacts,
    pub movie: Vec<MovieFacts>,
}

/// In-memory index over the two fact files.
///
/// Built once at startup and read-only afterwards, so lookups are safe to
/// repeat and to share across tasks.
#[derive(Debug, Default)]
pub struct FactIndex {
    pub(crate) users: HashMap<UserId, UserFacts>,
    pub(crate) movies: HashMap<MovieId, MovieFacts>,
}

impl FactIndex {
    /// Creates a new, empty FactIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up demographic facts for a user.
    pub fn get_user_facts(&self, user_id: UserId) -> Result<UserFacts> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or(DataLoadError::UserNotFound(user_id))
    }

    /// Look up metadata for a movie.
    pub fn get_movie_facts(&self, movie_id: MovieId) -> Result<MovieFacts> {
        self.movies
            .get(&movie_id)
            .cloned()
            .ok_or(DataLoadError::MovieNotFound(movie_id))
    }

    /// Look up the user plus every movie in the watch sequence, in order.
    ///
    /// Fails on the first missing identifier.
    pub fn get_all(&self, user_id: UserId, movie_ids: &[MovieId]) -> Result<ProfileFacts> {
        let user = self.get_user_facts(user_id)?;
        let movie = movie_ids
            .iter()
            .map(|&id| self.get_movie_facts(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(ProfileFacts { user, movie })
    }

    /// Insert a user into the index
    pub fn insert_user(&mut self, user_id: UserId, facts: UserFacts) {
        self.users.insert(user_id, facts);
    }

    /// Insert a movie into the index
    pub fn insert_movie(&mut self, movie_id: MovieId, facts: MovieFacts) {
        self.movies.insert(movie_id, facts);
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.users.len(), self.movies.len())
    }
}
