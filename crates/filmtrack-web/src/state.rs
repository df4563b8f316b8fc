//! Application state management

use crate::{
    api_client::{ApiClient, FilmApi},
    views::FilmListView,
};
use filmtrack_core::{Config, Result};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

/// Application state shared by all handlers
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Client for the film collection endpoint
    pub api: Arc<dyn FilmApi>,
    /// The list view; its handlers take turns through the lock
    pub film_list: Mutex<FilmListView>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create state talking to `web.api_base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let api = Arc::new(ApiClient::from_config(&config)?);
        Ok(Self::with_api(config, api))
    }

    /// Create state around any [`FilmApi`] implementation
    pub fn with_api(config: Config, api: Arc<dyn FilmApi>) -> Self {
        let film_list = FilmListView::new(Arc::clone(&api), config.web.list_title.clone());
        Self {
            config,
            api,
            film_list: Mutex::new(film_list),
        }
    }
}
