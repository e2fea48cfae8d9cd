//! Home page: donation post listing and search trigger

use axum::{
    Form,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use super::layout::{escape, escape_attr, render_page};
use super::pagination::{DONATION_PAGE_SIZE, Page};
use crate::AppState;
use crate::data::DonationPost;
use crate::error::AppError;
use crate::service::SearchOutcome;

/// `?page=` query string
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

/// Home page form submission
#[derive(Debug, Default, Deserialize)]
pub struct HomeForm {
    query: Option<String>,
    /// Presence alone triggers the bulk delete
    clear_posts: Option<String>,
}

/// Status line shown above the listing
#[derive(Debug, Clone)]
struct Notice {
    message: String,
    is_error: bool,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// GET /
///
/// Clears alert posts, then lists donation posts newest first.
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, AppError> {
    state.db.clear_alert_posts().await?;
    render_home(&state, params.page.as_deref(), None).await
}

/// POST /
///
/// `clear_posts` deletes every donation post; otherwise `query` runs the
/// search pipeline.
pub async fn home_submit(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Form(form): Form<HomeForm>,
) -> Result<Html<String>, AppError> {
    state.db.clear_alert_posts().await?;

    let notice = if form.clear_posts.is_some() {
        let removed = state.db.delete_all_donation_posts().await?;
        tracing::info!(removed, "Donation posts cleared");
        Notice::info(format!("Removed {removed} posts."))
    } else {
        match form.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => match state.search.run(query).await? {
                SearchOutcome::Completed { created: 0 } => {
                    Notice::info("No new fundraisers found.")
                }
                SearchOutcome::Completed { created } => {
                    Notice::info(format!("Found {created} new fundraisers."))
                }
                SearchOutcome::Failed { reason } => Notice::error(reason),
            },
            None => Notice::error("Enter what the fundraiser is for."),
        }
    };

    render_home(&state, params.page.as_deref(), Some(notice)).await
}

async fn render_home(
    state: &AppState,
    raw_page: Option<&str>,
    notice: Option<Notice>,
) -> Result<Html<String>, AppError> {
    let total = state.db.count_donation_posts().await?;
    let page = Page::resolve(raw_page, total.max(0) as usize, DONATION_PAGE_SIZE);
    let posts = state
        .db
        .list_donation_posts(page.per_page as i64, page.offset() as i64)
        .await?;

    let notice_html = notice
        .map(|notice| {
            let class = if notice.is_error {
                "notice error"
            } else {
                "notice"
            };
            format!(
                r#"<p class="{}">{}</p>"#,
                class,
                escape(&notice.message)
            )
        })
        .unwrap_or_default();

    let listing = if posts.is_empty() {
        "<p>No fundraisers yet. Search for one above.</p>".to_string()
    } else {
        posts.iter().map(render_post).collect::<Vec<_>>().join("\n")
    };

    let body = format!(
        r#"<h1>Fundraisers</h1>
<form method="post" action="/">
  <input type="text" name="query" placeholder="дрон, авто, тепловізор..." />
  <button type="submit">Search</button>
</form>
<form method="post" action="/">
  <button type="submit" name="clear_posts" value="1">Clear posts</button>
</form>
{}
<section class="posts">
{}
</section>
{}"#,
        notice_html,
        listing,
        render_pagination(&page)
    );

    Ok(render_page("Donations", "/", &body))
}

fn render_post(post: &DonationPost) -> String {
    format!(
        r#"<article>
  <h2>{}</h2>
  <p>{}</p>
  <a href="{}" target="_blank" rel="noopener noreferrer">Donate</a>
</article>"#,
        escape(&post.title),
        escape(&post.content),
        escape_attr(&post.source)
    )
}

fn render_pagination(page: &Page) -> String {
    let previous = if page.has_previous() {
        format!(
            r#"<a href="/?page=1">&laquo; first</a><a href="/?page={}">previous</a>"#,
            page.number - 1
        )
    } else {
        String::new()
    };

    let next = if page.has_next() {
        format!(
            r#"<a href="/?page={}">next</a><a href="/?page={}">last &raquo;</a>"#,
            page.number + 1,
            page.num_pages
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="pagination">{}<span>Page {} of {}</span>{}</div>"#,
        previous, page.number, page.num_pages, next
    )
}
