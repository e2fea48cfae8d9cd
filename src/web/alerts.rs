//! Alerts page

use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;

use super::layout::{escape, escape_attr, render_page};
use crate::AppState;
use crate::error::AppError;

/// Alerts form submission
#[derive(Debug, Default, Deserialize)]
pub struct AlertsForm {
    /// Region name
    query: Option<String>,
}

/// GET /alerts/
pub async fn alerts_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let posts = state.db.list_alert_posts().await?;

    let listing = posts
        .iter()
        .map(|post| {
            format!(
                "<article>\n  <h2>{}</h2>\n  <p>{}</p>\n  <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">alerts.in.ua</a>\n</article>",
                escape(&post.title),
                escape(&post.content),
                escape_attr(&post.source)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<h1>Air-raid alerts</h1>
<form method="post" action="/alerts/">
  <input type="text" name="query" placeholder="Київська" />
  <button type="submit">Check region</button>
</form>
<section class="posts">
{}
</section>"#,
        listing
    );

    Ok(render_page("Alerts", "/alerts/", &body))
}

/// POST /alerts/
///
/// Renders alerts for the submitted region, then redirects back so a
/// refresh does not resubmit the form.
pub async fn alerts_submit(
    State(state): State<AppState>,
    Form(form): Form<AlertsForm>,
) -> Result<Redirect, AppError> {
    let outcome = state.alerts.render(form.query.as_deref()).await?;
    tracing::debug!(?outcome, "Alert render finished");

    Ok(Redirect::to("/alerts/"))
}
