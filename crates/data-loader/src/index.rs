//! FactIndex loading.
//!
//! Reads both fact files in parallel and builds the in-memory index used
//! for all lookups.

use crate::error::Result;
use crate::parser;
use crate::types::FactIndex;
use std::path::Path;

impl FactIndex {
    /// Load users.dat and movies.dat from a dataset directory.
    ///
    /// The two files are independent, so they are parsed in parallel with
    /// `rayon::join`. Any malformed row fails the whole load.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let users_path = data_dir.join("users.dat");
        let movies_path = data_dir.join("movies.dat");

        let (users, movies) = rayon::join(
            || parser::parse_users(&users_path),
            || parser::parse_movies(&movies_path),
        );
        let users = users?;
        let movies = movies?;

        let mut index = FactIndex::new();
        for (id, facts) in users {
            index.insert_user(id, facts);
        }
        for (id, facts) in movies {
            index.insert_movie(id, facts);
        }

        Ok(index)
    }
}
