//! Film record types and genre normalization
//!
//! Genres are stored as a single comma-joined string (`"Comedy, Romance"`).
//! Forms work with a list of names; [`normalize_genres`] and [`split_genres`]
//! convert between the two at the UI/storage boundary.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Film identifier assigned by the film store
pub type FilmId = u64;

/// Separator used when joining genre names for storage
pub const GENRE_SEPARATOR: &str = ", ";

/// Highest accepted rating
pub const MAX_RATING: f64 = 10.0;

/// A film record as held by the store, with its identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    /// Store-assigned identifier
    pub id: FilmId,

    /// Film title
    pub title: String,

    /// Release year
    #[serde(default)]
    pub year: i32,

    /// Comma-joined genre names
    #[serde(default, deserialize_with = "deserialize_genre")]
    pub genre: String,

    /// Rating, `0` meaning unrated
    #[serde(default)]
    pub rating: f64,

    /// Whether the film has been watched
    #[serde(default)]
    pub watched: bool,

    /// Whether the film is marked as a favorite
    #[serde(default)]
    pub favorite: bool,
}

/// A film record without an identifier, as sent on create and update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct NewFilm {
    /// Film title
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: String,

    /// Release year
    #[serde(default)]
    pub year: i32,

    /// Comma-joined genre names
    #[serde(default, deserialize_with = "deserialize_genre")]
    pub genre: String,

    /// Rating, `0` meaning unrated
    #[serde(default)]
    #[validate(range(min = 0.0, max = 10.0), custom(function = "validate_finite"))]
    pub rating: f64,

    /// Whether the film has been watched
    #[serde(default)]
    pub watched: bool,

    /// Whether the film is marked as a favorite
    #[serde(default)]
    pub favorite: bool,
}

impl Film {
    /// Attach an identifier to a new film record
    #[must_use]
    pub fn from_new(id: FilmId, film: NewFilm) -> Self {
        Self {
            id,
            title: film.title,
            year: film.year,
            genre: film.genre,
            rating: film.rating,
            watched: film.watched,
            favorite: film.favorite,
        }
    }

    /// Strip the identifier, e.g. to build an update payload
    #[must_use]
    pub fn to_new(&self) -> NewFilm {
        NewFilm {
            title: self.title.clone(),
            year: self.year,
            genre: self.genre.clone(),
            rating: self.rating,
            watched: self.watched,
            favorite: self.favorite,
        }
    }

    /// Individual genre names of this film
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        split_genres(&self.genre)
    }

    /// Whether the film carries a non-zero rating
    #[must_use]
    pub fn is_rated(&self) -> bool {
        self.rating != 0.0
    }
}

fn validate_not_blank(title: &str) -> Result<(), validator::ValidationError> {
    if title.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

// `range` lets NaN through since every comparison with it is false
#[allow(clippy::trivially_copy_pass_by_ref)]
fn validate_finite(rating: f64) -> Result<(), validator::ValidationError> {
    if !rating.is_finite() {
        return Err(validator::ValidationError::new("not_finite"));
    }
    Ok(())
}

/// Split a stored genre string into trimmed, non-empty names
pub fn split_genres(genre: &str) -> impl Iterator<Item = &str> {
    genre.split(',').map(str::trim).filter(|name| !name.is_empty())
}

/// Flatten a list of genre names into the stored representation
///
/// Names are trimmed, empty names dropped, and exact duplicates removed
/// keeping the first occurrence. Each entry may itself contain commas.
#[must_use]
pub fn normalize_genres<S: AsRef<str>>(names: &[S]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for name in names.iter().flat_map(|n| split_genres(n.as_ref())) {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.join(GENRE_SEPARATOR)
}

/// Accept `genre` as a string, a list of strings, or null
fn deserialize_genre<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GenreField {
        Text(String),
        List(Vec<String>),
    }

    Ok(match Option::<GenreField>::deserialize(deserializer)? {
        Some(GenreField::Text(text)) => text,
        Some(GenreField::List(names)) => normalize_genres(&names),
        None => String::new(),
    })
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use validator::Validate;

    fn sample_new() -> NewFilm {
        NewFilm {
            title: "Django Unchained".to_string(),
            year: 2012,
            genre: "Western".to_string(),
            rating: 8.0,
            watched: true,
            favorite: true,
        }
    }

    #[rstest]
    #[case("Comedy, Romance", vec!["Comedy", "Romance"])]
    #[case("Action", vec!["Action"])]
    #[case("", vec![])]
    #[case(" , ,", vec![])]
    #[case("Sci-Fi ,  Drama,", vec!["Sci-Fi", "Drama"])]
    fn test_split_genres(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_genres(input).collect::<Vec<_>>(), expected);
    }

    #[rstest]
    #[case(&["Western"], "Western")]
    #[case(&["Comedy", " Romance "], "Comedy, Romance")]
    #[case(&["Drama", "", "Drama"], "Drama")]
    #[case(&["Action, Thriller", "Crime"], "Action, Thriller, Crime")]
    #[case(&[], "")]
    fn test_normalize_genres(#[case] input: &[&str], #[case] expected: &str) {
        assert_eq!(normalize_genres(input), expected);
    }

    #[test]
    fn test_genre_accepts_string() {
        let film: Film = serde_json::from_str(
            r#"{"id":1,"title":"Lion King","year":1994,"genre":"Family","rating":9.0,"watched":true,"favorite":true}"#,
        )
        .unwrap();

        assert_eq!(film.genre, "Family");
        assert_eq!(film.id, 1);
        assert!(film.favorite);
    }

    #[test]
    fn test_genre_accepts_list() {
        let film: NewFilm = serde_json::from_str(
            r#"{"title":"Django Unchained","year":2012,"genre":["Western","Drama"],"rating":8.0,"watched":true,"favorite":true}"#,
        )
        .unwrap();

        assert_eq!(film.genre, "Western, Drama");
    }

    #[test]
    fn test_genre_missing_or_null() {
        let missing: Film = serde_json::from_str(r#"{"id":4,"title":"X"}"#).unwrap();
        let null: Film = serde_json::from_str(r#"{"id":5,"title":"Y","genre":null}"#).unwrap();

        assert_eq!(missing.genre, "");
        assert_eq!(null.genre, "");
        assert!(!missing.is_rated());
    }

    #[test]
    fn test_new_film_serializes_without_id() {
        let json = serde_json::to_value(sample_new()).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["genre"], "Western");
    }

    #[test]
    fn test_from_new_and_back() {
        let film = Film::from_new(3, sample_new());

        assert_eq!(film.id, 3);
        assert_eq!(film.title, "Django Unchained");
        assert_eq!(film.to_new(), sample_new());
    }

    #[test]
    fn test_validation_rejects_blank_title() {
        let mut film = sample_new();
        film.title = "   ".to_string();
        assert!(film.validate().is_err());

        film.title = String::new();
        assert!(film.validate().is_err());
    }

    #[test]
    fn test_validation_rating_range() {
        let mut film = sample_new();
        assert!(film.validate().is_ok());

        film.rating = 0.0;
        assert!(film.validate().is_ok());

        film.rating = 10.5;
        assert!(film.validate().is_err());

        film.rating = -1.0;
        assert!(film.validate().is_err());

        film.rating = f64::NAN;
        assert!(film.validate().is_err());

        film.rating = f64::INFINITY;
        assert!(film.validate().is_err());
    }

    #[test]
    fn test_film_genres_iterator() {
        let film = Film::from_new(
            2,
            NewFilm {
                title: "B".to_string(),
                genre: "Comedy, Romance".to_string(),
                ..NewFilm::default()
            },
        );

        assert_eq!(film.genres().collect::<Vec<_>>(), vec!["Comedy", "Romance"]);
    }
}
