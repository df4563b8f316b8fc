//! Film collection endpoints

use crate::{extractors::ValidatedJson, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use filmtrack_core::{Error, Film, FilmId, NewFilm};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Rejection returned by the film handlers
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a store error onto an HTTP status and body
pub fn error_response(err: &Error) -> ApiError {
    let (status, code) = match err {
        Error::Validation { .. } => (StatusCode::BAD_REQUEST, "INVALID_FILM"),
        Error::NotFound { .. } => (StatusCode::NOT_FOUND, "FILM_NOT_FOUND"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    let details = match err {
        Error::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
        _ => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
            details,
        }),
    )
}

/// List every film in insertion order
///
/// ```text
/// GET /films
/// ```
pub async fn list_films(State(state): State<Arc<AppState>>) -> Json<Vec<Film>> {
    let films = state.store.list();
    info!("Listing {} films", films.len());
    Json(films)
}

/// Fetch one film by id
pub async fn get_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<FilmId>,
) -> Result<Json<Film>, ApiError> {
    state.store.get(id).map(Json).map_err(|e| {
        warn!("Film lookup failed: {}", e);
        error_response(&e)
    })
}

/// Create a film; the store assigns its identifier
///
/// Returns `201 Created` with the stored record.
pub async fn create_film(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewFilm>,
) -> Result<(StatusCode, Json<Film>), ApiError> {
    match state.store.create(payload) {
        Ok(film) => {
            info!(id = film.id, "Created film '{}'", film.title);
            Ok((StatusCode::CREATED, Json(film)))
        }
        Err(e) => {
            warn!("Rejected film: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Replace all fields of a film
///
/// Any `id` in the body is ignored; the path decides which film changes.
pub async fn update_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<FilmId>,
    ValidatedJson(payload): ValidatedJson<NewFilm>,
) -> Result<Json<Film>, ApiError> {
    match state.store.update(id, payload) {
        Ok(film) => {
            info!(id, "Updated film '{}'", film.title);
            Ok(Json(film))
        }
        Err(e) => {
            if matches!(e, Error::NotFound { .. } | Error::Validation { .. }) {
                warn!("Update of film {} rejected: {}", id, e);
            } else {
                error!("Update of film {} failed: {}", id, e);
            }
            Err(error_response(&e))
        }
    }
}

/// Delete a film; the response body is empty
pub async fn delete_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<FilmId>,
) -> Result<StatusCode, ApiError> {
    match state.store.delete(id) {
        Ok(film) => {
            info!(id, "Deleted film '{}'", film.title);
            Ok(StatusCode::OK)
        }
        Err(e) => {
            warn!("Delete of film {} rejected: {}", id, e);
            Err(error_response(&e))
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_response_validation() {
        let (status, Json(body)) = error_response(&Error::validation("title", "blank"));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_FILM");
        assert_eq!(body.details, Some(serde_json::json!({ "field": "title" })));
    }

    #[test]
    fn test_error_response_not_found() {
        let (status, Json(body)) = error_response(&Error::film_not_found(3));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "FILM_NOT_FOUND");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_error_response_internal() {
        let (status, Json(body)) = error_response(&Error::Other("lock poisoned".to_string()));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "lock poisoned");
    }
}
