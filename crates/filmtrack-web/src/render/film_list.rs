//! Film list page: table, failure banner, and the create/edit form

use super::{attr, error_banner, layout, text};
use crate::views::{FilmForm, FilmListView, Notice};
use filmtrack_core::{Film, FilmId, stats::format_rating};
use std::fmt::Write as _;

/// Genres offered in the multi-select; anything else goes in "other genres"
pub const GENRE_CHOICES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Horror",
    "Musical",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "Western",
];

/// Render the whole list page
#[must_use]
pub fn page(view: &FilmListView, notice: Option<&Notice>) -> String {
    let content = format!(
        "<h1>{}</h1>\n{}\n{}\n{}",
        text(view.title()),
        error_banner(notice),
        film_table(view.films(), view.editing()),
        film_form(view.form(), view.editing()),
    );
    layout(view.title(), &content)
}

fn film_table(films: &[Film], editing: Option<FilmId>) -> String {
    if films.is_empty() {
        return r#"<p class="empty">No films yet.</p>"#.to_string();
    }

    let rows: String = films.iter().map(|film| film_row(film, editing)).collect();
    format!(
        r#"<table class="film-list">
<thead><tr><th>Title</th><th>Year</th><th>Genre</th><th>Rating</th><th>Watched</th><th>Favorite</th><th>Actions</th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
    )
}

fn film_row(film: &Film, editing: Option<FilmId>) -> String {
    let class = if editing == Some(film.id) {
        r#" class="editing""#
    } else {
        ""
    };
    let year = if film.year == 0 {
        String::new()
    } else {
        film.year.to_string()
    };
    let rating = if film.is_rated() {
        format_rating(film.rating)
    } else {
        "Unrated".to_string()
    };

    format!(
        r#"<tr{class}><td>{title}</td><td>{year}</td><td>{genre}</td><td>{rating}</td><td>{watched}</td><td>{favorite}</td><td>
<form class="inline" method="post" action="/films/{id}/edit"><button type="submit" class="btn btn-sm">Edit</button></form>
<form class="inline" method="post" action="/films/{id}/delete"><button type="submit" class="btn btn-sm">Delete</button></form>
</td></tr>
"#,
        id = film.id,
        title = text(&film.title),
        genre = text(&film.genre),
        watched = if film.watched { "Yes" } else { "No" },
        favorite = if film.favorite { "&#9733;" } else { "" },
    )
}

fn film_form(form: &FilmForm, editing: Option<FilmId>) -> String {
    let (heading, submit) = if editing.is_some() {
        ("Edit Film", "Save Changes")
    } else {
        ("Add a Film", "Add Film")
    };

    let mut options = String::new();
    for choice in GENRE_CHOICES {
        let selected = if form.genres.iter().any(|g| g == choice) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(options, r#"<option value="{choice}"{selected}>{choice}</option>"#);
    }

    let other = form
        .genres
        .iter()
        .filter(|g| !GENRE_CHOICES.contains(&g.as_str()))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let year = if form.year == 0 {
        String::new()
    } else {
        form.year.to_string()
    };

    let cancel = if editing.is_some() {
        r#"<button type="submit" class="btn" formaction="/films/cancel" formnovalidate>Cancel</button>"#
    } else {
        ""
    };

    // The submission names its own edit target
    let target = editing.map_or_else(String::new, |id| {
        format!(r#"<input type="hidden" name="id" value="{id}">"#)
    });

    format!(
        r#"<form class="film-form" method="post" action="/films/save">
<h3>{heading}</h3>{target}
<label>Title <input type="text" name="title" value="{title}" required></label>
<label>Year <input type="number" name="year" value="{year}"></label>
<label>Genres <select name="genre" multiple size="6">
{options}</select></label>
<label>Other genres <input type="text" name="genre_other" value="{other}" placeholder="Comma separated"></label>
<label>Rating <input type="number" name="rating" min="0" max="10" step="0.1" value="{rating}"></label>
<label><input type="checkbox" name="watched"{watched}> Watched</label>
<label><input type="checkbox" name="favorite"{favorite}> Favorite</label>
<div><button type="submit" class="btn btn-primary">{submit}</button> {cancel}</div>
</form>"#,
        title = attr(&form.title),
        other = attr(&other),
        rating = form.rating,
        watched = if form.watched { " checked" } else { "" },
        favorite = if form.favorite { " checked" } else { "" },
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn film(id: FilmId, title: &str) -> Film {
        Film {
            id,
            title: title.to_string(),
            year: 1994,
            genre: "Family, Animation".to_string(),
            rating: 8.25,
            watched: true,
            favorite: true,
        }
    }

    #[test]
    fn test_empty_table() {
        assert!(film_table(&[], None).contains("No films yet."));
    }

    #[test]
    fn test_row_escapes_title() {
        let html = film_table(&[film(1, "<Tom & Jerry>")], None);
        assert!(html.contains("&lt;Tom &amp; Jerry&gt;"));
        assert!(html.contains(r#"action="/films/1/edit""#));
        assert!(html.contains(r#"action="/films/1/delete""#));
        assert!(html.contains("8.3"));
    }

    #[test]
    fn test_editing_row_is_marked() {
        let html = film_table(&[film(1, "A"), film(2, "B")], Some(2));
        assert_eq!(html.matches(r#"class="editing""#).count(), 1);
    }

    #[test]
    fn test_form_preselects_known_genres() {
        let form = FilmForm {
            title: "Lion King".to_string(),
            year: 1994,
            genres: vec!["Family".to_string(), "Coming-of-age".to_string()],
            rating: 9.0,
            watched: true,
            favorite: false,
        };
        let html = film_form(&form, Some(3));

        assert!(html.contains(r#"<option value="Family" selected>"#));
        assert!(html.contains(r#"<option value="Drama">"#));
        assert!(html.contains(r#"name="genre_other" value="Coming-of-age""#));
        assert!(html.contains("Save Changes"));
        assert!(html.contains(r#"formaction="/films/cancel""#));
        assert!(html.contains(r#"name="watched" checked"#));
        assert!(!html.contains(r#"name="favorite" checked"#));
        assert!(html.contains(r#"<input type="hidden" name="id" value="3">"#));
    }

    #[test]
    fn test_create_form_has_no_cancel() {
        let html = film_form(&FilmForm::default(), None);
        assert!(html.contains("Add Film"));
        assert!(!html.contains("Cancel"));
        assert!(html.contains(r#"name="year" value="""#));
        assert!(!html.contains(r#"name="id""#));
    }
}
