//! Film list view: the local film sequence plus the create/edit form

use super::{Notice, Operation};
use crate::api_client::FilmApi;
use filmtrack_core::{Error, Film, FilmId, NewFilm, Result, types::normalize_genres};
use std::{fmt, sync::Arc};
use tracing::{error, info};
use validator::Validate;

/// Genre names chosen in the form
pub type GenreSelection = Vec<String>;

/// Contents of the create/edit form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilmForm {
    /// Title as typed; trimmed on submit
    pub title: String,
    /// Release year
    pub year: i32,
    /// Selected genre names
    pub genres: GenreSelection,
    /// Rating, `0` for unrated
    pub rating: f64,
    /// Watched checkbox
    pub watched: bool,
    /// Favorite checkbox
    pub favorite: bool,
}

impl FilmForm {
    /// Copy a film into the form, splitting its genre string
    #[must_use]
    pub fn from_film(film: &Film) -> Self {
        Self {
            title: film.title.clone(),
            year: film.year,
            genres: film.genres().map(ToString::to_string).collect(),
            rating: film.rating,
            watched: film.watched,
            favorite: film.favorite,
        }
    }

    /// Validate the form and build the payload sent to the API
    ///
    /// # Errors
    ///
    /// Returns a validation error if the title is blank or the rating is out
    /// of range.
    pub fn to_new_film(&self) -> Result<NewFilm> {
        let film = NewFilm {
            title: self.title.trim().to_string(),
            year: self.year,
            genre: normalize_genres(&self.genres),
            rating: self.rating,
            watched: self.watched,
            favorite: self.favorite,
        };
        film.validate()?;
        Ok(film)
    }
}

/// State behind the film list page
pub struct FilmListView {
    api: Arc<dyn FilmApi>,
    title: String,
    films: Vec<Film>,
    form: FilmForm,
    editing: Option<FilmId>,
    notice: Option<Notice>,
}

impl fmt::Debug for FilmListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilmListView")
            .field("title", &self.title)
            .field("films", &self.films.len())
            .field("editing", &self.editing)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl FilmListView {
    /// Create an empty view; call [`load`](Self::load) to fetch the collection
    pub fn new(api: Arc<dyn FilmApi>, title: impl Into<String>) -> Self {
        Self {
            api,
            title: title.into(),
            films: Vec::new(),
            form: FilmForm::default(),
            editing: None,
            notice: None,
        }
    }

    /// Heading shown above the list
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Films in collection order
    #[must_use]
    pub fn films(&self) -> &[Film] {
        &self.films
    }

    /// Current form contents
    #[must_use]
    pub const fn form(&self) -> &FilmForm {
        &self.form
    }

    /// Replace the form contents, e.g. from a submitted HTML form
    pub fn set_form(&mut self, form: FilmForm) {
        self.form = form;
    }

    /// Id of the film being edited, if any
    #[must_use]
    pub const fn editing(&self) -> Option<FilmId> {
        self.editing
    }

    /// Pending failure banner, without clearing it
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Drain the pending failure banner for rendering
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Fetch the collection and replace the local sequence
    ///
    /// On failure the previous sequence is kept.
    ///
    /// # Errors
    ///
    /// Returns the client error after recording a [`Notice`].
    pub async fn load(&mut self) -> Result<()> {
        match self.api.list_films().await {
            Ok(films) => {
                info!("Loaded {} films", films.len());
                self.films = films;
                Ok(())
            }
            Err(e) => Err(self.fail(Operation::Load, e)),
        }
    }

    /// Submit the form: create when nothing is being edited, update otherwise
    ///
    /// On success the local sequence reflects the server's record, and the
    /// form and edit target are reset.
    ///
    /// # Errors
    ///
    /// Returns a validation error (no request is sent) or the client error.
    /// Either way a [`Notice`] is recorded and the form is kept.
    pub async fn save_film(&mut self) -> Result<Film> {
        let operation = self.current_operation();
        let payload = match self.form.to_new_film() {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(operation, e)),
        };

        let result = match self.editing {
            Some(id) => self.api.update_film(id, &payload).await,
            None => self.api.create_film(&payload).await,
        };

        let film = match result {
            Ok(film) => film,
            Err(e) => return Err(self.fail(operation, e)),
        };

        match self.editing {
            Some(id) => {
                if let Some(slot) = self.films.iter_mut().find(|f| f.id == id) {
                    slot.clone_from(&film);
                } else {
                    self.films.push(film.clone());
                }
                info!(id, "Updated film '{}'", film.title);
            }
            None => {
                info!(id = film.id, "Added film '{}'", film.title);
                self.films.push(film.clone());
            }
        }

        self.cancel_edit();
        Ok(film)
    }

    /// Save a form whose edit target came with it, as from a posted page
    ///
    /// `id` replaces any edit pending on the view, so a submission without
    /// one always creates.
    ///
    /// # Errors
    ///
    /// See [`save_film`](Self::save_film).
    pub async fn submit(&mut self, id: Option<FilmId>, form: FilmForm) -> Result<Film> {
        self.editing = id;
        self.form = form;
        self.save_film().await
    }

    /// Load a film into the form and mark it as the edit target
    pub fn start_edit(&mut self, film: &Film) {
        self.editing = Some(film.id);
        self.form = FilmForm::from_film(film);
    }

    /// [`start_edit`](Self::start_edit) for a film in the local sequence
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such film is loaded.
    pub fn start_edit_by_id(&mut self, id: FilmId) -> Result<()> {
        let film = self
            .films
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| Error::film_not_found(id))?;
        self.start_edit(&film);
        Ok(())
    }

    /// Clear the edit target and reset the form
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form = FilmForm::default();
    }

    /// Delete a film remotely, then drop it from the local sequence
    ///
    /// # Errors
    ///
    /// Returns the client error after recording a [`Notice`]; the local
    /// sequence is unchanged.
    pub async fn remove_film(&mut self, id: FilmId) -> Result<()> {
        if let Err(e) = self.api.delete_film(id).await {
            return Err(self.fail(Operation::Delete, e));
        }

        if let Some(pos) = self.films.iter().position(|f| f.id == id) {
            let film = self.films.remove(pos);
            info!(id, "Removed film '{}'", film.title);
        }
        if self.editing == Some(id) {
            self.cancel_edit();
        }
        Ok(())
    }

    /// Record a failure that happened before the view was consulted,
    /// such as a form that could not be parsed
    ///
    /// `target` is the edit target the submission named, if any.
    pub fn reject(&mut self, target: Option<FilmId>, err: Error) {
        self.fail(operation_for(target), err);
    }

    const fn current_operation(&self) -> Operation {
        operation_for(self.editing)
    }

    fn fail(&mut self, operation: Operation, err: Error) -> Error {
        error!("{} {}", operation.failure_message(), err);
        self.notice = Some(Notice::new(operation, &err));
        err
    }
}

const fn operation_for(target: Option<FilmId>) -> Operation {
    if target.is_some() {
        Operation::Update
    } else {
        Operation::Create
    }
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
    use crate::render;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn film(id: FilmId, title: &str, genre: &str, rating: f64) -> Film {
        Film {
            id,
            title: title.to_string(),
            year: 2000,
            genre: genre.to_string(),
            rating,
            watched: false,
            favorite: false,
        }
    }

    fn loaded_view(mut api: MockFilmApi, films: Vec<Film>) -> FilmListView {
        api.expect_list_films()
            .times(1)
            .returning(move || Ok(films.clone()));
        FilmListView::new(Arc::new(api), "My Films")
    }

    #[tokio::test]
    async fn test_load_replaces_sequence() {
        let mut view = loaded_view(
            MockFilmApi::new(),
            vec![film(1, "Mamma Mia", "Comedy, Musical", 6.5)],
        );

        view.load().await.unwrap();

        assert_eq!(view.films().len(), 1);
        assert!(view.notice().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_sequence() {
        let mut api = MockFilmApi::new();
        let mut calls = 0;
        api.expect_list_films().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![film(1, "Lion King", "Family", 9.0)])
            } else {
                Err(Error::Http("connection refused".to_string()))
            }
        });
        let mut view = FilmListView::new(Arc::new(api), "My Films");

        view.load().await.unwrap();
        assert!(view.load().await.is_err());

        assert_eq!(view.films().len(), 1);
        let notice = view.take_notice().unwrap();
        assert_eq!(notice.operation, Operation::Load);
        assert_eq!(notice.message(), "Could not load films.");
        assert!(view.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_create_appends_with_server_id() {
        let mut api = MockFilmApi::new();
        api.expect_create_film()
            .withf(|f: &NewFilm| f.title == "Django Unchained" && f.genre == "Western, Drama")
            .times(1)
            .returning(|f| Ok(Film::from_new(42, f.clone())));
        let mut view = loaded_view(api, Vec::new());
        view.load().await.unwrap();

        view.set_form(FilmForm {
            title: "  Django Unchained ".to_string(),
            year: 2012,
            genres: vec!["Western".to_string(), " Drama".to_string(), "Western".to_string()],
            rating: 8.0,
            watched: true,
            favorite: true,
        });
        let created = view.save_film().await.unwrap();

        assert_eq!(created.id, 42);
        assert_eq!(view.films(), &[created]);
        assert_eq!(view.form(), &FilmForm::default());

        let html = render::film_list::page(&view, None);
        assert!(html.contains("Django Unchained"));
    }

    #[tokio::test]
    async fn test_blank_title_sends_no_request() {
        let mut api = MockFilmApi::new();
        api.expect_create_film().times(0);
        let mut view = loaded_view(api, Vec::new());
        view.load().await.unwrap();

        view.set_form(FilmForm {
            title: "   ".to_string(),
            ..Default::default()
        });
        let err = view.save_film().await.unwrap_err();

        assert!(matches!(err, Error::Validation { .. }));
        assert!(view.films().is_empty());
        assert_eq!(view.form().title, "   ");
        assert_eq!(view.notice().unwrap().operation, Operation::Create);
    }

    #[tokio::test]
    async fn test_edit_replaces_in_place() {
        let mut api = MockFilmApi::new();
        api.expect_update_film()
            .with(eq(2), mockall::predicate::always())
            .times(1)
            .returning(|id, f| Ok(Film::from_new(id, f.clone())));
        let mut view = loaded_view(
            api,
            vec![
                film(1, "Mamma Mia", "Comedy", 6.5),
                film(2, "Lion King", "Family", 7.0),
                film(3, "Matrix", "Sci-Fi", 0.0),
            ],
        );
        view.load().await.unwrap();

        view.start_edit_by_id(2).unwrap();
        assert_eq!(view.editing(), Some(2));
        assert_eq!(view.form().genres, vec!["Family".to_string()]);

        let mut form = view.form().clone();
        form.rating = 9.0;
        form.genres.push("Animation".to_string());
        view.set_form(form);
        view.save_film().await.unwrap();

        let titles: Vec<&str> = view.films().iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Mamma Mia", "Lion King", "Matrix"]);
        assert_eq!(view.films()[1].rating, 9.0);
        assert_eq!(view.films()[1].genre, "Family, Animation");
        assert_eq!(view.editing(), None);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_form() {
        let mut api = MockFilmApi::new();
        api.expect_update_film().times(1).returning(|_, _| {
            Err(Error::Api {
                status: 500,
                message: "boom".to_string(),
            })
        });
        let mut view = loaded_view(api, vec![film(5, "Heat", "Crime", 8.0)]);
        view.load().await.unwrap();

        view.start_edit_by_id(5).unwrap();
        assert!(view.save_film().await.is_err());

        assert_eq!(view.editing(), Some(5));
        assert_eq!(view.form().title, "Heat");
        assert_eq!(view.notice().unwrap().message(), "Could not update the film.");
    }

    #[tokio::test]
    async fn test_start_edit_unknown_id() {
        let mut view = loaded_view(MockFilmApi::new(), Vec::new());
        view.load().await.unwrap();

        assert!(view.start_edit_by_id(99).unwrap_err().is_not_found());
        assert_eq!(view.editing(), None);
    }

    #[tokio::test]
    async fn test_remove_film_removes_exactly_one() {
        let mut api = MockFilmApi::new();
        api.expect_delete_film()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(()));
        let mut view = loaded_view(
            api,
            vec![
                film(1, "Mamma Mia", "Comedy", 6.5),
                film(2, "Lion King", "Family", 7.0),
            ],
        );
        view.load().await.unwrap();
        view.start_edit_by_id(2).unwrap();

        view.remove_film(2).await.unwrap();

        assert_eq!(view.films().len(), 1);
        assert_eq!(view.editing(), None);
        let html = render::film_list::page(&view, None);
        assert!(!html.contains("Lion King"));
        assert!(html.contains("Mamma Mia"));
    }

    #[tokio::test]
    async fn test_failed_delete_records_notice() {
        let mut api = MockFilmApi::new();
        api.expect_delete_film()
            .times(1)
            .returning(|id| Err(Error::film_not_found(id)));
        let mut view = loaded_view(api, vec![film(1, "Matrix", "Sci-Fi", 8.0)]);
        view.load().await.unwrap();

        assert!(view.remove_film(1).await.is_err());

        assert_eq!(view.films().len(), 1);
        let notice = view.take_notice().unwrap();
        assert_eq!(notice.message(), "Could not delete the film.");

        let html = render::film_list::page(&view, Some(&notice));
        assert!(html.contains("error-banner"));
        assert!(html.contains("Could not delete the film."));
    }

    #[test]
    fn test_cancel_edit_resets_form() {
        let mut view = FilmListView::new(Arc::new(MockFilmApi::new()), "My Films");
        view.start_edit(&film(3, "Matrix", "Sci-Fi, Action", 8.0));
        assert_eq!(view.form().genres.len(), 2);

        view.cancel_edit();

        assert_eq!(view.editing(), None);
        assert_eq!(view.form(), &FilmForm::default());
    }

    #[test]
    fn test_reject_uses_submitted_target() {
        let mut view = FilmListView::new(Arc::new(MockFilmApi::new()), "My Films");
        view.start_edit(&film(3, "Matrix", "", 8.0));

        view.reject(None, Error::validation("year", "not a number"));
        assert_eq!(view.notice().unwrap().operation, Operation::Create);

        view.reject(Some(3), Error::validation("year", "not a number"));
        assert_eq!(view.notice().unwrap().operation, Operation::Update);
    }

    #[tokio::test]
    async fn test_submit_without_target_creates_despite_pending_edit() {
        let mut api = MockFilmApi::new();
        api.expect_update_film().times(0);
        api.expect_create_film()
            .times(1)
            .returning(|f| Ok(Film::from_new(2, f.clone())));
        let mut view = loaded_view(api, vec![film(1, "Heat", "Crime", 8.0)]);
        view.load().await.unwrap();
        view.start_edit_by_id(1).unwrap();

        let form = FilmForm {
            title: "Django Unchained".to_string(),
            year: 2012,
            ..Default::default()
        };
        let created = view.submit(None, form).await.unwrap();

        assert_eq!(created.id, 2);
        assert_eq!(view.films()[0].title, "Heat");
        assert_eq!(view.films().len(), 2);
        assert_eq!(view.editing(), None);
    }

    #[tokio::test]
    async fn test_submit_with_target_updates() {
        let mut api = MockFilmApi::new();
        api.expect_create_film().times(0);
        api.expect_update_film()
            .with(eq(1), mockall::predicate::always())
            .times(1)
            .returning(|id, f| Ok(Film::from_new(id, f.clone())));
        let mut view = loaded_view(api, vec![film(1, "Heat", "Crime", 8.0)]);
        view.load().await.unwrap();

        let form = FilmForm {
            title: "Heat".to_string(),
            rating: 9.0,
            ..Default::default()
        };
        view.submit(Some(1), form).await.unwrap();

        assert_eq!(view.films().len(), 1);
        assert_eq!(view.films()[0].rating, 9.0);
    }
}
