//! Page handlers rendering the views as HTML

use crate::{render, state::AppState, views::FilmStatsView};
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Html,
};
use std::sync::Arc;
use tracing::debug;

/// Film list page; every visit refetches the collection
pub async fn film_list_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut view = state.film_list.lock().await;

    // A failed load is recorded on the view and shown as a banner
    if let Err(e) = view.load().await {
        debug!("Rendering film list with stale data: {}", e);
    }

    let notice = view.take_notice();
    Html(render::film_list::page(&view, notice.as_ref()))
}

/// Statistics page; a fresh view per visit
pub async fn stats_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut view = FilmStatsView::new(
        Arc::clone(&state.api),
        state.config.stats.top_genres_limit,
    );

    if let Err(e) = view.load().await {
        debug!("Rendering empty statistics: {}", e);
    }

    Html(render::film_stats::page(&view))
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(render::not_found(uri.path())))
}
