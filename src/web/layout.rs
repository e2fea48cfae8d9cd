//! Shared HTML shell for every page

use axum::response::Html;

/// Navigation entries: (path, label)
const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Donations"),
    ("/alerts/", "Alerts"),
    ("/foundations/", "Foundations"),
    ("/about/", "About"),
];

const STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 760px; margin: 0 auto; padding: 1rem; }
    nav a { margin-right: 1rem; }
    nav a.active { font-weight: bold; }
    article { border-bottom: 1px solid #ddd; padding: 0.75rem 0; }
    .notice { background: #fff4cc; padding: 0.5rem 0.75rem; }
    .notice.error { background: #ffd6d6; }
    .pagination a, .pagination span { margin-right: 0.5rem; }
"#;

/// Escape text for element content
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape text for a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Wrap `body` in the site layout
///
/// `title` is escaped here; `body` must already be safe HTML.
pub fn render_page(title: &str, active_path: &str, body: &str) -> Html<String> {
    let nav = NAV_LINKS
        .iter()
        .map(|(path, label)| {
            let class = if *path == active_path {
                r#" class="active""#
            } else {
                ""
            };
            format!(r#"<a href="{path}"{class}>{label}</a>"#)
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="uk">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{} - Donation Hub</title>
  <style>{}</style>
</head>
<body>
  <nav>
    {}
  </nav>
  <main>
{}
  </main>
</body>
</html>"#,
        escape(title),
        STYLE,
        nav,
        body
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_active_link() {
        let Html(page) = render_page("Alerts", "/alerts/", "<p>body</p>");
        assert!(page.contains(r#"<a href="/alerts/" class="active">Alerts</a>"#));
        assert!(page.contains(r#"<a href="/">Donations</a>"#));
        assert!(page.contains("<p>body</p>"));
    }

    #[test]
    fn escapes_title() {
        let Html(page) = render_page("<script>", "/", "");
        assert!(page.contains("&lt;script&gt; - Donation Hub"));
    }
}
