//! Ordered in-memory film store
//!
//! Films are kept in insertion order. Identifiers come from a counter that
//! only moves forward, so a deleted id is never handed out again.

use filmtrack_core::{Error, Film, FilmId, NewFilm, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Shared handle to the film collection
#[derive(Debug, Clone)]
pub struct FilmStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug)]
struct StoreInner {
    films: IndexMap<FilmId, Film>,
    next_id: FilmId,
}

impl Default for FilmStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilmStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                films: IndexMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a store holding `films` in the given order
    ///
    /// # Errors
    ///
    /// Returns a validation error if two films share an identifier.
    pub fn with_films(films: Vec<Film>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(films.len());
        for film in films {
            let id = film.id;
            if map.insert(id, film).is_some() {
                return Err(Error::validation("id", format!("duplicate film id {id}")));
            }
        }
        let next_id = map.keys().max().map_or(1, |max| max + 1);

        Ok(Self {
            inner: Arc::new(RwLock::new(StoreInner {
                films: map,
                next_id,
            })),
        })
    }

    /// Load a store from a JSON array of films
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds duplicate ids.
    pub fn from_seed_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let films: Vec<Film> = serde_json::from_str(&raw)?;
        info!("Seeding film store with {} films from {}", films.len(), path.display());
        Self::with_films(films)
    }

    /// All films in insertion order
    #[must_use]
    pub fn list(&self) -> Vec<Film> {
        self.inner.read().films.values().cloned().collect()
    }

    /// Look up a single film
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no film has this id.
    pub fn get(&self, id: FilmId) -> Result<Film> {
        self.inner
            .read()
            .films
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::film_not_found(id))
    }

    /// Insert a new film under the next free identifier
    ///
    /// # Errors
    ///
    /// Returns a validation error if the payload is invalid.
    pub fn create(&self, film: NewFilm) -> Result<Film> {
        film.validate()?;

        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let created = Film::from_new(id, film);
        inner.films.insert(id, created.clone());
        debug!(id, title = %created.title, "Film created");
        Ok(created)
    }

    /// Replace every field of an existing film, keeping its position
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid payload, or `NotFound`.
    pub fn update(&self, id: FilmId, film: NewFilm) -> Result<Film> {
        film.validate()?;

        let mut inner = self.inner.write();
        let slot = inner
            .films
            .get_mut(&id)
            .ok_or_else(|| Error::film_not_found(id))?;
        *slot = Film::from_new(id, film);
        debug!(id, "Film updated");
        Ok(slot.clone())
    }

    /// Remove exactly one film, preserving the order of the rest
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no film has this id.
    pub fn delete(&self, id: FilmId) -> Result<Film> {
        let removed = self
            .inner
            .write()
            .films
            .shift_remove(&id)
            .ok_or_else(|| Error::film_not_found(id))?;
        debug!(id, "Film deleted");
        Ok(removed)
    }

    /// Number of stored films
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().films.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().films.is_empty()
    }
}
