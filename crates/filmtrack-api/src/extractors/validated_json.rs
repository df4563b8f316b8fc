//! JSON body extractor that validates before the handler runs

use crate::handlers::films::{ApiError, error_response};
use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use filmtrack_core::Error;
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

/// Deserialized and validated JSON body
///
/// Both malformed JSON and failed validation are answered with
/// `400 INVALID_FILM` in the usual [`ErrorResponse`](crate::handlers::films::ErrorResponse)
/// shape instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let message = rejection.body_text();
                warn!("Unreadable film payload: {}", message);
                error_response(&Error::validation("body", message))
            })?;

        data.validate().map_err(|errors| {
            let err = Error::from(errors);
            warn!("Rejected film: {}", err);
            error_response(&err)
        })?;

        Ok(Self(data))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use filmtrack_core::NewFilm;
    use http::header;
    use pretty_assertions::assert_eq;

    async fn extract(content_type: &str, body: &str) -> Result<ValidatedJson<NewFilm>, ApiError> {
        let req = http::Request::post("/films")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        ValidatedJson::<NewFilm>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_accepts_valid_film() {
        let ValidatedJson(film) = extract("application/json", r#"{"title":"Heat","rating":8}"#)
            .await
            .unwrap();

        assert_eq!(film.title, "Heat");
    }

    #[tokio::test]
    async fn test_missing_title_is_bad_request() {
        let (status, axum::Json(body)) =
            extract("application/json", r#"{"year":2000,"rating":5}"#)
                .await
                .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_FILM");
        assert!(body.error.contains("title"));
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let (status, _) = extract("application/json", r#"{"title":"X","rating":"high"}"#)
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let (status, _) = extract("text/plain", r#"{"title":"X"}"#).await.unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_failure_names_field() {
        let (status, axum::Json(body)) =
            extract("application/json", r#"{"title":"X","rating":11}"#)
                .await
                .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.details, Some(serde_json::json!({ "field": "rating" })));
    }
}
