//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate database and upstream API operations.

mod alerts;
mod search;

pub use alerts::{
    ALERT_POST_TITLE, ALERTS_UNAVAILABLE_MESSAGE, AlertOutcome, AlertRenderer,
    INVALID_REGION_MESSAGE, normalize_region, translate_alert_type,
};
pub use search::{SEARCH_FAILED_MESSAGE, SearchOutcome, SearchPipeline};
