//! External collaborators
//!
//! - Custom Search JSON API
//! - alerts.in.ua active alerts API
//! - Result page fetch + hyperlink scan

mod alerts_api;
mod page_scan;
mod search_api;

pub use alerts_api::{ActiveAlert, AlertsApiClient};
pub use page_scan::{find_qualifying_link, scan_page};
pub use search_api::{SearchApiClient, SearchItem};
