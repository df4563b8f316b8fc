//! Application state management

use crate::store::FilmStore;
use filmtrack_core::{Config, Result};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Film collection
    pub store: FilmStore,
}

impl AppState {
    /// Create application state, seeding the store if a seed file is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the configured seed file cannot be loaded.
    pub fn new(config: Config) -> Result<Self> {
        let store = match config.store.seed_file.as_deref() {
            Some(path) => FilmStore::from_seed_file(path)?,
            None => FilmStore::new(),
        };

        Ok(Self { config, store })
    }

    /// Create application state around an existing store
    #[must_use]
    pub const fn with_store(config: Config, store: FilmStore) -> Self {
        Self { config, store }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_appstate_new_without_seed() {
        let state = AppState::new(Config::default()).unwrap();
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_appstate_new_with_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"[{"id": 7, "title": "Heat", "genre": "Crime"}]"#).unwrap();

        let mut config = Config::default();
        config.store.seed_file = Some(path);
        let state = AppState::new(config).unwrap();

        assert_eq!(state.store.len(), 1);
        assert_eq!(state.store.get(7).unwrap().title, "Heat");
    }

    #[test]
    fn test_appstate_bad_seed_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "not json").unwrap();

        let mut config = Config::default();
        config.store.seed_file = Some(path);

        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn test_appstate_clone_shares_store() {
        let state = AppState::with_store(Config::default(), FilmStore::new());
        let copy = state.clone();

        copy.store
            .create(filmtrack_core::NewFilm {
                title: "Shared".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(state.store.len(), 1);
    }
}
