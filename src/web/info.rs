//! Static informational pages

use axum::response::Html;

use super::layout::render_page;

/// (name, description, url)
const FOUNDATIONS: &[(&str, &str, &str)] = &[
    (
        "Повернись живим",
        "Supplies equipment and training to the Ukrainian defence forces.",
        "https://savelife.in.ua/",
    ),
    (
        "Фонд Сергія Притули",
        "Buys vehicles, drones and gear for frontline units.",
        "https://prytulafoundation.org/",
    ),
    (
        "UNITED24",
        "The official fundraising platform of Ukraine.",
        "https://u24.gov.ua/",
    ),
    (
        "Госпітальєри",
        "Volunteer paramedic battalion evacuating the wounded.",
        "https://www.hospitallers.life/",
    ),
];

/// GET /foundations/
pub async fn foundations() -> Html<String> {
    let items = FOUNDATIONS
        .iter()
        .map(|(name, description, url)| {
            format!(
                "<article>\n  <h2>{name}</h2>\n  <p>{description}</p>\n  <a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{url}</a>\n</article>"
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    render_page(
        "Foundations",
        "/foundations/",
        &format!("<h1>Foundations</h1>\n{items}"),
    )
}

/// GET /about/
pub async fn about() -> Html<String> {
    render_page(
        "About",
        "/about/",
        r#"<h1>About</h1>
<p>Donation Hub searches the web for fundraisers that collect money through
Monobank jars and lists the jars it finds, so you can donate without digging
through news articles and social posts.</p>
<p>The alerts page shows whether an air-raid alert is active in a region,
using data from <a href="https://alerts.in.ua/">alerts.in.ua</a>.</p>"#,
    )
}
