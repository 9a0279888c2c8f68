//! Parser for the MovieLens fact files.
//!
//! Two files are consumed:
//! - users.dat: userId::gender::age::occupation::zipcode
//! - movies.dat: movieId::title::genres
//!
//! Fields are delimited by the two-character token `::`, genres inside the
//! last movie field by `|`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a file with ISO-8859-1 encoding (Latin-1).
///
/// The MovieLens dataset is not UTF-8; several titles carry accented
/// characters. ISO-8859-1 is a single-byte encoding where each byte maps
/// directly to the Unicode code point with the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn parse_gender(s: &str) -> Gender {
    match s {
        "F" => Gender::Female,
        "M" => Gender::Male,
        _ => Gender::Unknown,
    }
}

/// Parse the users.dat file
///
/// Format: userId::gender::age::occupation::zipcode
///
/// The zipcode is read but not retained; nothing downstream consumes it.
pub fn parse_users(path: &Path) -> Result<Vec<(UserId, UserFacts)>> {
    let lines = read_lines_latin1(path)?;
    let mut users = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue; // Skip empty lines
        }

        let mut parts = line_trimmed.split("::");

        let user_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "users.dat".to_string(),
            line: line_no,
            reason: "Missing userId".to_string(),
        })?;

        let gender = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "users.dat".to_string(),
            line: line_no,
            reason: "Missing gender".to_string(),
        })?;

        let age = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "users.dat".to_string(),
            line: line_no,
            reason: "Missing age".to_string(),
        })?;

        let occupation = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "users.dat".to_string(),
            line: line_no,
            reason: "Missing occupation".to_string(),
        })?;

        let _zipcode = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "users.dat".to_string(),
            line: line_no,
            reason: "Missing zipcode".to_string(),
        })?;

        let id: UserId = user_id.parse().map_err(|e| DataLoadError::ParseError {
            file: "users.dat".to_string(),
            line: line_no,
            reason: format!("Invalid userId: {}", e),
        })?;

        let facts = UserFacts {
            gender: parse_gender(gender),
            age: age.parse().map_err(|e| DataLoadError::ParseError {
                file: "users.dat".to_string(),
                line: line_no,
                reason: format!("Invalid age: {}", e),
            })?,
            occupation: occupation.parse().map_err(|e| DataLoadError::ParseError {
                file: "users.dat".to_string(),
                line: line_no,
                reason: format!("Invalid occupation: {}", e),
            })?,
        };

        users.push((id, facts));
    }

    Ok(users)
}

/// Parse the movies.dat file
///
/// Format: movieId::title::genres
///
/// The title often includes year in parentheses: "Toy Story (1995)".
/// Genres are pipe-separated: "Animation|Children's|Comedy".
pub fn parse_movies(path: &Path) -> Result<Vec<(MovieId, MovieFacts)>> {
    let lines = read_lines_latin1(path)?;
    let mut movies = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue; // Skip empty lines
        }

        let mut parts = line_trimmed.split("::");

        let movie_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "movies.dat".to_string(),
            line: line_no,
            reason: "Missing movieId".to_string(),
        })?;

        let title = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "movies.dat".to_string(),
            line: line_no,
            reason: "Missing title".to_string(),
        })?;

        let genres_str = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: "movies.dat".to_string(),
            line: line_no,
            reason: "Missing genres".to_string(),
        })?;

        let id: MovieId = movie_id.parse().map_err(|e| DataLoadError::ParseError {
            file: "movies.dat".to_string(),
            line: line_no,
            reason: format!("Invalid movieId: {}", e),
        })?;

        let facts = MovieFacts {
            title: title.to_string(),
            genres: parse_genres(genres_str)?,
        };

        movies.push((id, facts));
    }
    Ok(movies)
}

/// Parse pipe-separated genres, preserving file order.
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Result<Vec<String>> {
    let mut genres = Vec::new();
    for genre in s.split('|') {
        if genre.is_empty() {
            return Err(DataLoadError::InvalidValue {
                field: "genre".to_string(),
                value: s.to_string(),
            });
        }
        genres.push(genre.to_string());
    }
    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("cineloop-test-{}-{}", std::process::id(), name));
        let mut f = File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_parse_users() {
        let path = write_temp("users.dat", b"1::F::1::10::48067\n2::M::56::16::70072\n");
        let users = parse_users(&path).unwrap();
        assert_eq!(users.len(), 2);

        let (id, facts) = &users[0];
        assert_eq!(*id, 1);
        assert_eq!(facts.gender, Gender::Female);
        assert_eq!(facts.age, 1);
        assert_eq!(facts.occupation, 10);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_users_unknown_gender() {
        let path = write_temp("users-ukn.dat", b"7::X::25::4::12345\n");
        let users = parse_users(&path).unwrap();
        assert_eq!(users[0].1.gender, Gender::Unknown);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_users_missing_field() {
        let path = write_temp("users-bad.dat", b"1::F::1\n");
        let err = parse_users(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 1, .. }));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_movies() {
        let path = write_temp(
            "movies.dat",
            b"1::Toy Story (1995)::Animation|Children's|Comedy\n",
        );
        let movies = parse_movies(&path).unwrap();
        assert_eq!(movies.len(), 1);

        let (id, facts) = &movies[0];
        assert_eq!(*id, 1);
        assert_eq!(facts.title, "Toy Story (1995)");
        assert_eq!(facts.genres, vec!["Animation", "Children's", "Comedy"]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_movies_latin1_title() {
        // "Les Misérables" with é as the Latin-1 byte 0xE9
        let path = write_temp("movies-l1.dat", b"1::Les Mis\xe9rables (1995)::Drama\n");
        let movies = parse_movies(&path).unwrap();
        assert_eq!(movies[0].1.title, "Les Misérables (1995)");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_movies_empty_genre() {
        let path = write_temp("movies-bad.dat", b"1::Broken::Drama||Comedy\n");
        let err = parse_movies(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
        std::fs::remove_file(path).ok();
    }
}
