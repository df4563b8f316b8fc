//! Shared helpers for end-to-end tests against a live filmtrack API

#![allow(dead_code)]

use filmtrack_api::{AppState as ApiState, FilmStore};
use filmtrack_core::{Config, Film, context_error, context_error::Result};
use filmtrack_web::ApiClient;
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, task::JoinHandle};

/// A running API server bound to an ephemeral port
pub struct TestApi {
    pub base_url: String,
    pub store: FilmStore,
    handle: JoinHandle<()>,
}

impl TestApi {
    /// Start an API server over the given store
    pub async fn start(store: FilmStore) -> Result<Self> {
        let app = filmtrack_api::build_router_with_state(ApiState::with_store(
            Config::default(),
            store.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test API server stopped: {e}");
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            store,
            handle,
        })
    }

    /// Start an API server seeded with films
    pub async fn seeded(films: Vec<Film>) -> Result<Self> {
        let store = FilmStore::with_films(films)
            .map_err(|e| context_error!("Failed to seed store: {}", e))?;
        Self::start(store).await
    }

    /// A client pointed at this server
    pub fn client(&self) -> Result<Arc<ApiClient>> {
        let client = ApiClient::with_timeout(self.base_url.clone(), Duration::from_secs(5))
            .map_err(|e| context_error!("Failed to build client: {}", e))?;
        Ok(Arc::new(client))
    }

    /// Web config whose API base URL is this server
    pub fn web_config(&self) -> Config {
        let mut config = Config::default();
        config.web.api_base_url.clone_from(&self.base_url);
        config
    }
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sample collection: two rated films, one unrated, two favorites
pub fn sample_films() -> Vec<Film> {
    vec![
        film(1, "Mamma Mia", "Comedy, Romance", 7.0, true),
        film(2, "Lion King", "Family", 6.5, true),
        film(3, "Matrix", "", 0.0, false),
    ]
}

pub fn film(id: u64, title: &str, genre: &str, rating: f64, favorite: bool) -> Film {
    Film {
        id,
        title: title.to_string(),
        year: 2000,
        genre: genre.to_string(),
        rating,
        watched: rating > 0.0,
        favorite,
    }
}
