//! Web server setup and configuration

use crate::{routes::build_routes, state::AppState};
use axum::Router;
use filmtrack_core::{Config, Result};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

/// Build the complete web application against the configured API
///
/// # Errors
///
/// Returns an error if the API client cannot be built.
pub fn build_app(config: Config) -> Result<Router> {
    Ok(build_app_with_state(AppState::new(config)?))
}

/// Build the web application around prepared state
pub fn build_app_with_state(state: AppState) -> Router {
    build_routes()
        .layer(CompressionLayer::new())
        .with_state(Arc::new(state))
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::api_client::MockFilmApi;
    use axum::body::{Body, to_bytes};
    use filmtrack_core::{Error, Film, NewFilm};
    use http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    fn film(id: u64, title: &str, genre: &str, rating: f64) -> Film {
        Film {
            id,
            title: title.to_string(),
            year: 2008,
            genre: genre.to_string(),
            rating,
            watched: true,
            favorite: false,
        }
    }

    fn app(api: MockFilmApi) -> Router {
        build_app_with_state(AppState::with_api(Config::default(), Arc::new(api)))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_film_list_page() {
        let mut api = MockFilmApi::new();
        api.expect_list_films()
            .times(1)
            .returning(|| Ok(vec![film(1, "Mamma Mia", "Comedy, Musical", 6.5)]));

        let response = app(api)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>My Films</h1>"));
        assert!(html.contains("Mamma Mia"));
        assert!(!html.contains("error-banner"));
    }

    #[tokio::test]
    async fn test_film_list_page_with_unreachable_api() {
        let mut api = MockFilmApi::new();
        api.expect_list_films()
            .times(1)
            .returning(|| Err(Error::Http("connection refused".to_string())));

        let response = app(api)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("error-banner"));
        assert!(html.contains("Could not load films."));
        assert!(html.contains("No films yet."));
    }

    #[tokio::test]
    async fn test_save_redirects_and_creates_once() {
        let mut api = MockFilmApi::new();
        api.expect_create_film()
            .withf(|f: &NewFilm| f.title == "Django Unchained" && f.favorite)
            .times(1)
            .returning(|f| Ok(Film::from_new(1, f.clone())));
        api.expect_list_films()
            .times(1)
            .returning(|| Ok(vec![film(1, "Django Unchained", "Western", 8.0)]));
        let app = app(api);

        let response = app
            .clone()
            .oneshot(form_post(
                "/films/save",
                "title=Django+Unchained&year=2012&genre=Western&rating=8&favorite=on",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Django Unchained"));
    }

    #[tokio::test]
    async fn test_save_without_id_creates_while_edit_pending() {
        let mut api = MockFilmApi::new();
        api.expect_list_films()
            .times(1)
            .returning(|| Ok(vec![film(1, "Heat", "Crime", 8.0)]));
        api.expect_update_film().times(0);
        api.expect_create_film()
            .withf(|f: &NewFilm| f.title == "Django Unchained" && f.year == 2012)
            .times(1)
            .returning(|f| Ok(Film::from_new(2, f.clone())));
        let app = app(api);

        app.clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(form_post("/films/1/edit", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // Another client's add form carries no id
        let response = app
            .oneshot(form_post("/films/save", "title=Django+Unchained&year=2012"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_edit_form_posts_its_target() {
        let mut api = MockFilmApi::new();
        api.expect_list_films()
            .times(2)
            .returning(|| Ok(vec![film(1, "Heat", "Crime", 8.0)]));
        api.expect_create_film().times(0);
        api.expect_update_film()
            .withf(|id: &u64, f: &NewFilm| *id == 1 && f.rating == 9.0)
            .times(1)
            .returning(|id, f| Ok(Film::from_new(id, f.clone())));
        let app = app(api);

        app.clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        app.clone()
            .oneshot(form_post("/films/1/edit", ""))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains(r#"<input type="hidden" name="id" value="1">"#));

        let response = app
            .oneshot(form_post("/films/save", "id=1&title=Heat&genre=Crime&rating=9"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_failed_delete_shows_banner_on_next_render() {
        let mut api = MockFilmApi::new();
        api.expect_delete_film().times(1).returning(|_| {
            Err(Error::Api {
                status: 500,
                message: "disk full".to_string(),
            })
        });
        api.expect_list_films()
            .times(1)
            .returning(|| Ok(vec![film(4, "Heat", "Crime", 8.0)]));
        let app = app(api);

        let response = app
            .clone()
            .oneshot(form_post("/films/4/delete", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Could not delete the film."));
        assert!(html.contains("disk full"));
        assert!(html.contains("Heat"));
    }

    #[tokio::test]
    async fn test_unparseable_form_records_notice() {
        let mut api = MockFilmApi::new();
        api.expect_create_film().times(0);
        api.expect_list_films().times(1).returning(|| Ok(Vec::new()));
        let app = app(api);

        app.clone()
            .oneshot(form_post("/films/save", "title=Heat&year=soon"))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Could not add the film."));
    }

    #[tokio::test]
    async fn test_stats_page() {
        let mut api = MockFilmApi::new();
        api.expect_list_films().times(1).returning(|| {
            Ok(vec![
                film(1, "Mamma Mia", "Comedy, Romance", 7.0),
                film(2, "Lion King", "Family", 6.5),
                film(3, "Matrix", "", 0.0),
            ])
        });

        let response = app(api)
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Total Films"));
        assert!(html.contains("6.8"));
        assert!(html.contains("Mamma Mia (7.0)"));
        assert!(html.contains("Comedy (1)"));
    }

    #[tokio::test]
    async fn test_health_and_not_found() {
        let app = app(MockFilmApi::new());

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let response = app
            .oneshot(Request::get("/films/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page Not Found"));
    }
}
