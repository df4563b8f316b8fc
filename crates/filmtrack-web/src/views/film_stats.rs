//! Statistics view: one fetch per mount, aggregates derived from it

use super::{Notice, Operation};
use crate::api_client::FilmApi;
use filmtrack_core::{FilmStats, Result};
use std::{fmt, sync::Arc};
use tracing::{error, info};

/// State behind the statistics page
pub struct FilmStatsView {
    api: Arc<dyn FilmApi>,
    top_genres_limit: Option<usize>,
    stats: FilmStats,
    notice: Option<Notice>,
}

impl fmt::Debug for FilmStatsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilmStatsView")
            .field("stats", &self.stats)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl FilmStatsView {
    /// Create a view; `top_genres_limit` caps the genre ranking when set
    pub fn new(api: Arc<dyn FilmApi>, top_genres_limit: Option<usize>) -> Self {
        Self {
            api,
            top_genres_limit,
            stats: FilmStats::default(),
            notice: None,
        }
    }

    /// Fetch the collection and compute the aggregates
    ///
    /// # Errors
    ///
    /// Returns the client error after recording a [`Notice`]; stats stay empty.
    pub async fn load(&mut self) -> Result<()> {
        match self.api.list_films().await {
            Ok(films) => {
                self.stats = FilmStats::compute(&films, self.top_genres_limit);
                info!(
                    total = self.stats.total,
                    favorites = self.stats.favorites,
                    "Computed film statistics"
                );
                Ok(())
            }
            Err(e) => {
                error!("{} {}", Operation::Load.failure_message(), e);
                self.notice = Some(Notice::new(Operation::Load, &e));
                Err(e)
            }
        }
    }

    /// Aggregates from the last successful load
    #[must_use]
    pub const fn stats(&self) -> &FilmStats {
        &self.stats
    }

    /// Failure notice from the last load, if it failed
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}
