//! Statistics page

use super::{error_banner, layout, text};
use crate::views::FilmStatsView;
use filmtrack_core::{FilmStats, stats::format_rating};

/// Render the statistics page
#[must_use]
pub fn page(view: &FilmStatsView) -> String {
    let stats = view.stats();
    let content = format!(
        r#"<div class="stats-page">
<h2>Film Statistics</h2>
{banner}
<div class="stats-grid">
{total}
{average}
{highest}
{favorites}
{genres}</div>
</div>"#,
        banner = error_banner(view.notice()),
        total = card("Total Films", &stats.total.to_string()),
        average = card("Avg Rating", &stats.average_rating_display()),
        highest = card("Highest Rated Film", &highest_rated(stats)),
        favorites = card("Favorites", &stats.favorites.to_string()),
        genres = top_genres(stats),
    );
    layout("Stats", &content)
}

fn card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="stats-card"><h3>{}</h3><div class="stats-value">{}</div></div>"#,
        text(label),
        text(value)
    )
}

fn highest_rated(stats: &FilmStats) -> String {
    stats.highest_rated.as_ref().map_or_else(
        || "N/A".to_string(),
        |film| format!("{} ({})", film.title, format_rating(film.rating)),
    )
}

/// The whole section is omitted when no film has a genre
fn top_genres(stats: &FilmStats) -> String {
    if !stats.has_genres() {
        return String::new();
    }

    let items: String = stats
        .top_genres
        .iter()
        .map(|g| format!("<li>{} ({})</li>", text(&g.name), g.count))
        .collect();
    format!(
        r#"<div class="stats-card"><h3>Top Genres</h3><ul class="genre-list">{items}</ul></div>
"#
    )
}
