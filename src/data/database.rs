//! SQLite database operations
//!
//! All database access goes through this module.

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::collections::HashSet;
use std::path::Path;

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        // Create connection string
        let connection_string = format!("sqlite:{}?mode=rwc", path.display());

        // Create connection pool
        let pool = SqlitePool::connect(&connection_string).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Donation posts
    // =========================================================================

    /// All stored jar URLs
    pub async fn donation_sources(&self) -> Result<HashSet<String>, AppError> {
        let sources = sqlx::query_scalar::<_, String>("SELECT source FROM donation_posts")
            .fetch_all(&self.pool)
            .await?;

        Ok(sources.into_iter().collect())
    }

    /// Insert a donation post
    ///
    /// A duplicate `source` violates the unique index and is returned
    /// as `AppError::Database`.
    pub async fn insert_donation_post(&self, post: &NewPost) -> Result<DonationPost, AppError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO donation_posts (title, content, source, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.source)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(DonationPost {
            id: result.last_insert_rowid(),
            title: post.title.clone(),
            content: post.content.clone(),
            source: post.source.clone(),
            created_at,
        })
    }

    /// Count donation posts
    pub async fn count_donation_posts(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donation_posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Get one page of donation posts, newest first
    pub async fn list_donation_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DonationPost>, AppError> {
        let posts = sqlx::query_as::<_, DonationPost>(
            "SELECT * FROM donation_posts ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Delete every donation post
    ///
    /// # Returns
    /// Number of deleted rows
    pub async fn delete_all_donation_posts(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM donation_posts")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Alert posts
    // =========================================================================

    /// All alert posts in insertion order
    pub async fn list_alert_posts(&self) -> Result<Vec<AlertPost>, AppError> {
        let posts = sqlx::query_as::<_, AlertPost>("SELECT * FROM alert_posts ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Replace all alert posts with `posts`
    ///
    /// Delete and inserts share one transaction, so concurrent readers see
    /// either the old set or the new one.
    pub async fn replace_alert_posts(&self, posts: &[NewPost]) -> Result<Vec<AlertPost>, AppError> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM alert_posts")
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(posts.len());
        for post in posts {
            let result = sqlx::query(
                r#"
                INSERT INTO alert_posts (title, content, source, created_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.source)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

            stored.push(AlertPost {
                id: result.last_insert_rowid(),
                title: post.title.clone(),
                content: post.content.clone(),
                source: post.source.clone(),
                created_at,
            });
        }

        tx.commit().await?;

        Ok(stored)
    }

    /// Delete every alert post
    ///
    /// # Returns
    /// Number of deleted rows
    pub async fn clear_alert_posts(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM alert_posts")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
