//! Data models
//!
//! Rust structs representing the two post tables.
//! Ids are SQLite autoincrement integers, timestamps use chrono.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum content length in characters
pub const CONTENT_MAX_CHARS: usize = 500;

// =============================================================================
// Donation posts
// =============================================================================

/// A discovered fundraiser link
///
/// `source` is the jar URL and is unique across the table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonationPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Jar URL (globally unique)
    pub source: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Alert posts
// =============================================================================

/// One rendered alert status message
///
/// Several rows may share the same `source`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlertPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Insert payload
// =============================================================================

/// Fields for a post that has not been stored yet
///
/// Title and content are truncated to the column limits on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub source: String,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: truncate_chars(title.into(), TITLE_MAX_CHARS),
            content: truncate_chars(content.into(), CONTENT_MAX_CHARS),
            source: source.into(),
        }
    }
}

fn truncate_chars(mut value: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = value.char_indices().nth(max_chars) {
        value.truncate(byte_index);
    }
    value
}
