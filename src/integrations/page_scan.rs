//! Result page fetch and hyperlink scan

use scraper::{Html, Selector};

use crate::error::AppError;

/// Return the first `<a href>` on the page that starts with `prefix`
pub fn find_qualifying_link(html: &str, prefix: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").ok()?;

    document
        .select(&link_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| href.starts_with(prefix))
        .map(str::to_string)
}

/// Fetch `url` and scan its hyperlinks for one beginning with `prefix`
///
/// The response status is not checked; error pages are scanned like any
/// other body.
pub async fn scan_page(
    http_client: &reqwest::Client,
    url: &str,
    prefix: &str,
) -> Result<Option<String>, AppError> {
    let body = http_client.get(url).send().await?.text().await?;
    // `Html` is not Send; parse only after the last await point
    Ok(find_qualifying_link(&body, prefix))
}
