//! Form actions for the film list
//!
//! Each action mutates the shared list view and redirects back to `/`.
//! Failures are recorded on the view and surface as a banner on the next
//! render, so every action answers with the same `303 See Other`.

use crate::{state::AppState, views::FilmForm};
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use filmtrack_core::{Error, FilmId, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// A posted film form together with the film it edits
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilmSubmission {
    /// Edit target from the hidden `id` field; `None` creates
    pub id: Option<FilmId>,
    /// Field values
    pub form: FilmForm,
}

/// Read the edit target from urlencoded pairs
///
/// # Errors
///
/// Returns a validation error when `id` is present but not a film id.
pub fn parse_target(pairs: &[(String, String)]) -> Result<Option<FilmId>> {
    let Some((_, value)) = pairs.iter().find(|(key, _)| key == "id") else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::validation("id", format!("'{value}' is not a film id")))
}

/// Build a [`FilmSubmission`] from urlencoded pairs
///
/// `genre` may repeat (multi-select). `genre_other` holds extra names
/// separated by commas. Checkboxes count as set when present. Empty numeric
/// fields default to zero.
///
/// # Errors
///
/// Returns a validation error when `id`, `year` or `rating` is not a number,
/// or when `rating` is not finite.
pub fn parse_film_form(pairs: &[(String, String)]) -> Result<FilmSubmission> {
    let id = parse_target(pairs)?;
    let mut form = FilmForm::default();

    for (key, value) in pairs {
        let value = value.trim();
        match key.as_str() {
            "title" => form.title = value.to_string(),
            "year" if !value.is_empty() => {
                form.year = value
                    .parse()
                    .map_err(|_| Error::validation("year", format!("'{value}' is not a year")))?;
            }
            "rating" if !value.is_empty() => {
                let rating: f64 = value.parse().map_err(|_| {
                    Error::validation("rating", format!("'{value}' is not a number"))
                })?;
                if !rating.is_finite() {
                    return Err(Error::validation(
                        "rating",
                        format!("'{value}' is not a finite number"),
                    ));
                }
                form.rating = rating;
            }
            "genre" | "genre_other" if !value.is_empty() => form.genres.push(value.to_string()),
            "watched" => form.watched = true,
            "favorite" => form.favorite = true,
            _ => {}
        }
    }

    Ok(FilmSubmission { id, form })
}

/// Update the film named by the form's `id` field, or create one without it
pub async fn save_film(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Redirect {
    let mut view = state.film_list.lock().await;

    match parse_film_form(&pairs) {
        Ok(FilmSubmission { id, form }) => {
            if let Err(e) = view.submit(id, form).await {
                debug!("save_film left a notice: {}", e);
            }
        }
        Err(e) => {
            warn!("Unreadable film form: {}", e);
            view.reject(parse_target(&pairs).ok().flatten(), e);
        }
    }

    Redirect::to("/")
}

/// Load a film into the form
pub async fn start_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<FilmId>,
) -> Redirect {
    let mut view = state.film_list.lock().await;
    if let Err(e) = view.start_edit_by_id(id) {
        warn!("Cannot edit film {}: {}", id, e);
    }
    Redirect::to("/")
}

/// Abandon the current edit
pub async fn cancel_edit(State(state): State<Arc<AppState>>) -> Redirect {
    state.film_list.lock().await.cancel_edit();
    Redirect::to("/")
}

/// Delete a film
pub async fn remove_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<FilmId>,
) -> Redirect {
    let mut view = state.film_list.lock().await;
    if let Err(e) = view.remove_film(id).await {
        debug!("remove_film left a notice: {}", e);
    }
    Redirect::to("/")
}
