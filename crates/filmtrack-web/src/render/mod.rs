//! Server-side HTML rendering
//!
//! Pages are plain strings assembled from small helpers. Everything that
//! originates from a film record or an error message goes through
//! [`text`] or [`attr`] before it reaches the markup.

pub mod film_list;
pub mod film_stats;

use crate::views::Notice;
use std::borrow::Cow;

const STYLE: &str = r"
body { font-family: sans-serif; margin: 0; background: #f6f6f6; color: #222; }
header { background: #20232a; color: #fff; padding: 0.75rem 1.5rem; display: flex; gap: 1.5rem; align-items: center; }
header a { color: #61dafb; text-decoration: none; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: 0.5rem; border-bottom: 1px solid #ddd; text-align: left; }
tr.editing { background: #fff8dc; }
.error-banner { background: #fdecea; color: #611a15; border: 1px solid #f5c6cb; padding: 0.75rem; margin-bottom: 1rem; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem; }
.stats-card { background: #fff; padding: 1rem; border-radius: 4px; }
.stats-value { font-size: 1.6rem; font-weight: bold; }
.film-form { background: #fff; padding: 1rem; margin-top: 1.5rem; display: grid; gap: 0.5rem; }
.inline { display: inline; }
.btn { cursor: pointer; }
";

/// Escape text content
pub fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escape a double-quoted attribute value
pub fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Wrap page content in the shared layout with navigation
#[must_use]
pub fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - filmtrack</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<strong>filmtrack</strong>
<nav><a href="/">Films</a> | <a href="/stats">Stats</a></nav>
</header>
<main>
{content}
</main>
</body>
</html>
"#,
        title = text(title),
    )
}

/// Failure banner, or nothing when there is no notice
#[must_use]
pub fn error_banner(notice: Option<&Notice>) -> String {
    notice.map_or_else(String::new, |notice| {
        format!(
            r#"<div class="error-banner" role="alert"><strong>{}</strong> <span>{}</span></div>"#,
            text(notice.message()),
            text(&notice.detail)
        )
    })
}

/// 404 page
#[must_use]
pub fn not_found(path: &str) -> String {
    layout(
        "Page Not Found",
        &format!(
            r#"<div class="not-found">
<h2>Page Not Found</h2>
<p>Nothing lives at <code>{}</code>.</p>
<a href="/" class="btn btn-primary">Back to Films</a>
</div>"#,
            text(path)
        ),
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::views::Operation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_escapes_markup() {
        assert_eq!(text("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
    }

    #[test]
    fn test_attr_escapes_quotes() {
        assert_eq!(attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_layout_has_navigation() {
        let html = layout("Films", "<p>body</p>");
        assert!(html.contains(r#"<a href="/">Films</a>"#));
        assert!(html.contains(r#"<a href="/stats">Stats</a>"#));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_error_banner() {
        assert_eq!(error_banner(None), "");

        let notice = Notice {
            operation: Operation::Create,
            detail: "API returned 500: <oops>".to_string(),
        };
        let html = error_banner(Some(&notice));
        assert!(html.contains(r#"class="error-banner""#));
        assert!(html.contains("Could not add the film."));
        assert!(html.contains("&lt;oops&gt;"));
    }

    #[test]
    fn test_not_found_escapes_path() {
        let html = not_found("/<script>");
        assert!(html.contains("Page Not Found"));
        assert!(!html.contains("<script>"));
    }
}
