//! HTTP client for the film collection endpoint
//!
//! [`FilmApi`] is the seam the views depend on. [`ApiClient`] implements it
//! over `reqwest`; tests substitute the generated `MockFilmApi`.

use async_trait::async_trait;
use filmtrack_core::{Config, Error, Film, FilmId, NewFilm, Result};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Remote operations on the film collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmApi: Send + Sync {
    /// Fetch every film, in collection order
    async fn list_films(&self) -> Result<Vec<Film>>;

    /// Create a film and return it with its assigned id
    async fn create_film(&self, film: &NewFilm) -> Result<Film>;

    /// Replace every field of an existing film
    async fn update_film(&self, id: FilmId, film: &NewFilm) -> Result<Film>;

    /// Delete a film by id
    async fn delete_film(&self, id: FilmId) -> Result<()>;
}

/// API client for the `/films` endpoint
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with reqwest's default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create a client from the `web` and `client` config sections
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(
            config.web.api_base_url.clone(),
            Duration::from_secs(config.client.request_timeout_secs),
        )
    }

    /// Base URL requests are issued against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn films_url(&self) -> String {
        format!("{}/films", self.base_url.trim_end_matches('/'))
    }

    fn film_url(&self, id: FilmId) -> String {
        format!("{}/{id}", self.films_url())
    }

    /// Turn a non-success status into [`Error::Api`], keeping the body text
    async fn check_status(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            format!("{action} failed")
        } else {
            format!("{action} failed: {body}")
        };

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl FilmApi for ApiClient {
    async fn list_films(&self) -> Result<Vec<Film>> {
        let url = self.films_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to fetch films: {e}")))?;

        let response = Self::check_status(response, "Listing films").await?;
        Self::parse(response).await
    }

    async fn create_film(&self, film: &NewFilm) -> Result<Film> {
        let url = self.films_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(film)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to create film: {e}")))?;

        let response = Self::check_status(response, "Creating film").await?;
        Self::parse(response).await
    }

    async fn update_film(&self, id: FilmId, film: &NewFilm) -> Result<Film> {
        let url = self.film_url(id);
        debug!("PUT {}", url);

        // The endpoint expects the full record, identifier included.
        let body = Film::from_new(id, film.clone());
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to update film {id}: {e}")))?;

        let response = Self::check_status(response, "Updating film").await?;
        Self::parse(response).await
    }

    async fn delete_film(&self, id: FilmId) -> Result<()> {
        let url = self.film_url(id);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to delete film {id}: {e}")))?;

        // Response body is ignored
        Self::check_status(response, "Deleting film").await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn film_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "year": 2012,
            "genre": "Western",
            "rating": 8.0,
            "watched": true,
            "favorite": true
        })
    }

    #[tokio::test]
    async fn test_list_films() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                film_json(1, "Django Unchained"),
                {"id": 2, "title": "Mamma Mia", "genre": ["Comedy", "Musical"]}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let films = client.list_films().await.unwrap();

        assert_eq!(films.len(), 2);
        assert_eq!(films[0].title, "Django Unchained");
        assert_eq!(films[1].genre, "Comedy, Musical");
    }

    #[tokio::test]
    async fn test_create_film_sends_payload_without_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/films"))
            .and(body_json(json!({
                "title": "Django Unchained",
                "year": 2012,
                "genre": "Western",
                "rating": 8.0,
                "watched": true,
                "favorite": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(film_json(7, "Django Unchained")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/", server.uri()));
        let created = client
            .create_film(&NewFilm {
                title: "Django Unchained".to_string(),
                year: 2012,
                genre: "Western".to_string(),
                rating: 8.0,
                watched: true,
                favorite: true,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 7);
    }

    #[tokio::test]
    async fn test_update_film_puts_full_record() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/films/3"))
            .and(body_json(json!({
                "id": 3,
                "title": "Lion King",
                "year": 1994,
                "genre": "Family",
                "rating": 9.0,
                "watched": false,
                "favorite": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "title": "Lion King",
                "year": 1994,
                "genre": "Family",
                "rating": 9.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let updated = client
            .update_film(
                3,
                &NewFilm {
                    title: "Lion King".to_string(),
                    year: 1994,
                    genre: "Family".to_string(),
                    rating: 9.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, 3);
        assert!(!updated.watched);
    }

    #[tokio::test]
    async fn test_delete_film_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/films/4"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        client.delete_film(4).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/films/9"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such film"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.delete_film(9).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "API returned 404: Deleting film failed: no such film"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.list_films().await.unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_http_error() {
        // Nothing listens on port 9 of localhost in the test environment
        let client =
            ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.list_films().await.unwrap_err();

        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn test_urls() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.films_url(), "http://localhost:3000/films");
        assert_eq!(client.film_url(12), "http://localhost:3000/films/12");
    }

    #[test]
    fn test_from_config() {
        let client = ApiClient::from_config(&Config::default()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3000");
    }
}
