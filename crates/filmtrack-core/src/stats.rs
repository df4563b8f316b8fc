//! Aggregate statistics over a film collection

use crate::types::Film;
use indexmap::IndexMap;
use serde::Serialize;

/// Occurrence count of a single genre name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    /// Genre name, case preserved
    pub name: String,
    /// Number of films carrying the genre
    pub count: usize,
}

/// Statistics derived from one fetched film sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilmStats {
    /// Number of films
    pub total: usize,

    /// Mean rating over rated films, `None` when nothing is rated
    pub average_rating: Option<f64>,

    /// Film with the highest rating, first occurrence on ties
    pub highest_rated: Option<Film>,

    /// Number of films marked favorite
    pub favorites: usize,

    /// Genre ranking, most frequent first
    pub top_genres: Vec<GenreCount>,
}

impl FilmStats {
    /// Compute all statistics for `films`
    ///
    /// Every distinct genre is ranked unless `top_n` caps the list.
    #[must_use]
    pub fn compute(films: &[Film], top_n: Option<usize>) -> Self {
        let mut top_genres = tally_genres(films);
        if let Some(limit) = top_n {
            top_genres.truncate(limit);
        }

        Self {
            total: films.len(),
            average_rating: average_rating(films),
            highest_rated: highest_rated(films).cloned(),
            favorites: films.iter().filter(|film| film.favorite).count(),
            top_genres,
        }
    }

    /// Average rating formatted for display, `"N/A"` when undefined
    #[must_use]
    pub fn average_rating_display(&self) -> String {
        self.average_rating.map_or_else(|| "N/A".to_string(), format_rating)
    }

    /// Whether the genre section has anything to show
    #[must_use]
    pub fn has_genres(&self) -> bool {
        !self.top_genres.is_empty()
    }
}

/// Mean of the non-zero ratings
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rating(films: &[Film]) -> Option<f64> {
    let (sum, count) = films
        .iter()
        .filter(|film| film.is_rated())
        .fold((0.0_f64, 0_usize), |(sum, count), film| {
            (sum + film.rating, count + 1)
        });

    (count > 0).then(|| sum / count as f64)
}

/// The film with the maximum rating; ties keep the earliest film
#[must_use]
pub fn highest_rated(films: &[Film]) -> Option<&Film> {
    films.iter().fold(None, |best: Option<&Film>, film| match best {
        Some(current) if film.rating <= current.rating => Some(current),
        _ => Some(film),
    })
}

/// Count genre occurrences across all films
///
/// Each film's genre string is split on commas and trimmed; empty names are
/// ignored. Names are compared case-sensitively. The result is ordered by
/// descending count, with ties in first-seen order.
#[must_use]
pub fn tally_genres(films: &[Film]) -> Vec<GenreCount> {
    let mut tally: IndexMap<&str, usize> = IndexMap::new();
    for name in films.iter().flat_map(Film::genres) {
        *tally.entry(name).or_insert(0) += 1;
    }

    let mut ranked: Vec<GenreCount> = tally
        .into_iter()
        .map(|(name, count)| GenreCount {
            name: name.to_string(),
            count,
        })
        .collect();
    // stable: equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Round half up to one decimal place and format
#[must_use]
pub fn format_rating(rating: f64) -> String {
    let rounded = (rating * 10.0 + 0.5).floor() / 10.0;
    format!("{rounded:.1}")
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::NewFilm;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn film(id: u64, title: &str, genre: &str, rating: f64, favorite: bool) -> Film {
        Film::from_new(
            id,
            NewFilm {
                title: title.to_string(),
                year: 2000,
                genre: genre.to_string(),
                rating,
                watched: true,
                favorite,
            },
        )
    }

    fn fixture() -> Vec<Film> {
        vec![
            film(1, "A", "Action", 7.0, false),
            film(2, "B", "Comedy, Romance", 6.5, true),
            film(3, "C", "Fantasy", 0.0, true),
        ]
    }

    #[test]
    fn test_compute_fixture() {
        let stats = FilmStats::compute(&fixture(), None);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_rating, Some(6.75));
        assert_eq!(stats.average_rating_display(), "6.8");
        assert_eq!(stats.highest_rated.as_ref().map(|f| f.title.as_str()), Some("A"));
        assert_eq!(stats.favorites, 2);
        assert!(stats.has_genres());

        let names: Vec<_> = stats.top_genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Comedy", "Romance", "Fantasy"]);
        assert!(stats.top_genres.iter().all(|g| g.count == 1));
    }

    #[test]
    fn test_empty_collection() {
        let stats = FilmStats::compute(&[], None);

        assert_eq!(stats, FilmStats::default());
        assert_eq!(stats.average_rating_display(), "N/A");
        assert!(!stats.has_genres());
    }

    #[test]
    fn test_all_unrated() {
        let films = vec![film(1, "X", "", 0.0, false), film(2, "Y", "", 0.0, false)];

        assert_eq!(average_rating(&films), None);
        // still the first film even though nothing is rated
        assert_eq!(highest_rated(&films).map(|f| f.id), Some(1));
    }

    #[test]
    fn test_no_genres_means_empty_tally() {
        let films = vec![film(1, "X", "", 5.0, false), film(2, "Y", " , ", 5.0, false)];
        let stats = FilmStats::compute(&films, None);

        assert!(!stats.has_genres());
    }

    #[test]
    fn test_highest_rated_tie_keeps_first() {
        let films = vec![
            film(1, "First", "", 8.0, false),
            film(2, "Second", "", 9.0, false),
            film(3, "Third", "", 9.0, false),
        ];

        assert_eq!(highest_rated(&films).map(|f| f.title.as_str()), Some("Second"));
    }

    #[test]
    fn test_tally_orders_by_count_then_first_seen() {
        let films = vec![
            film(1, "A", "Drama", 0.0, false),
            film(2, "B", "Comedy, Drama", 0.0, false),
            film(3, "C", "Horror, Comedy", 0.0, false),
            film(4, "D", "Drama, drama", 0.0, false),
        ];

        let tally = tally_genres(&films);
        assert_eq!(
            tally,
            vec![
                GenreCount { name: "Drama".to_string(), count: 3 },
                GenreCount { name: "Comedy".to_string(), count: 2 },
                GenreCount { name: "Horror".to_string(), count: 1 },
                GenreCount { name: "drama".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_genres_truncated() {
        let films = vec![film(1, "A", "A1, A2, A3, A4", 1.0, false)];
        let stats = FilmStats::compute(&films, Some(2));

        assert_eq!(stats.top_genres.len(), 2);
    }

    #[test]
    fn test_top_genres_unlimited_by_default() {
        let films = vec![
            film(1, "A", "G1, G2, G3, G4", 1.0, false),
            film(2, "B", "G5, G6, G7", 1.0, false),
        ];
        let stats = FilmStats::compute(&films, None);

        assert_eq!(stats.top_genres.len(), 7);
        assert_eq!(stats.top_genres.last().map(|g| g.name.as_str()), Some("G7"));
    }

    #[rstest]
    #[case(6.75, "6.8")]
    #[case(6.74, "6.7")]
    #[case(7.0, "7.0")]
    #[case(8.25, "8.3")]
    #[case(9.96, "10.0")]
    #[case(0.05, "0.1")]
    fn test_format_rating(#[case] rating: f64, #[case] expected: &str) {
        assert_eq!(format_rating(rating), expected);
    }

    proptest! {
        #[test]
        fn prop_total_matches_length(ratings in proptest::collection::vec(0u8..=10, 0..40)) {
            let films: Vec<Film> = ratings
                .iter()
                .enumerate()
                .map(|(i, r)| film(i as u64, "F", "Drama", f64::from(*r), i % 2 == 0))
                .collect();
            let stats = FilmStats::compute(&films, None);

            prop_assert_eq!(stats.total, films.len());
            prop_assert_eq!(stats.favorites, films.iter().filter(|f| f.favorite).count());
        }

        #[test]
        fn prop_average_ignores_zero_ratings(
            rated in proptest::collection::vec(1u8..=10, 1..20),
            unrated in 0usize..10,
        ) {
            let mut films: Vec<Film> = rated
                .iter()
                .enumerate()
                .map(|(i, r)| film(i as u64, "R", "", f64::from(*r), false))
                .collect();
            films.extend((0..unrated).map(|i| film(100 + i as u64, "U", "", 0.0, false)));

            let expected = rated.iter().map(|r| f64::from(*r)).sum::<f64>() / rated.len() as f64;
            let average = average_rating(&films).unwrap();
            prop_assert!((average - expected).abs() < 1e-9);
        }
    }
}
