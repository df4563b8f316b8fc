//! View state for the film list and statistics pages

pub mod film_list;
pub mod film_stats;

pub use film_list::{FilmForm, FilmListView, GenreSelection};
pub use film_stats::FilmStatsView;

use std::fmt;

/// The remote operation a [`Notice`] reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetching the collection
    Load,
    /// Creating a film
    Create,
    /// Updating a film
    Update,
    /// Deleting a film
    Delete,
}

impl Operation {
    /// User-facing headline shown when the operation fails
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Could not load films.",
            Self::Create => "Could not add the film.",
            Self::Update => "Could not update the film.",
            Self::Delete => "Could not delete the film.",
        }
    }
}

/// Failure banner recorded by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Which operation failed
    pub operation: Operation,
    /// Error text shown beneath the headline
    pub detail: String,
}

impl Notice {
    /// Record a failed operation
    pub fn new(operation: Operation, err: &filmtrack_core::Error) -> Self {
        Self {
            operation,
            detail: err.to_string(),
        }
    }

    /// Headline for the banner
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.operation.failure_message()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message(), self.detail)
    }
}
