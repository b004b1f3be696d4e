//! Storage layer for body stats.
//!
//! Persists one JSON document per user using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization (e.g. a `Mutex<Database>`).
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! `created_at` and `updated_at` are stored as TEXT in ISO 8601 format
//! (e.g., `2024-01-15T10:30:00Z`), always UTC.
//!
//! ## Document Storage
//!
//! The `data` column stores the whole [`BodyStats`] document as JSON. Saves
//! replace the document wholesale; there are no partial updates.
//! Loading goes through [`BodyStats::from_document`], so documents written by
//! older code with missing or reshaped fields still load, with those fields
//! reset to their defaults.

use std::path::Path;

use bs_core::{BodyStats, UserId};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The stored document is not valid JSON, or could not be encoded.
    #[error("invalid body stats document for {user_id}")]
    Json {
        user_id: String,
        #[source]
        source: serde_json::Error,
    },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {user_id}: {timestamp}")]
    TimestampParse {
        user_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Bookkeeping for one stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- One document per user
            -- data: JSON body stats document (birthDate, bfPercent, bodyweight, height)
            -- created_at / updated_at: ISO 8601 format (e.g., '2024-01-15T10:30:00Z')
            CREATE TABLE IF NOT EXISTS body_stats (
                user_id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_body_stats_updated ON body_stats(updated_at);
            ",
        )?;
        Ok(())
    }

    /// Loads a user's body stats, or `None` if nothing was ever saved.
    pub fn fetch_body_stats(&self, user: &UserId) -> Result<Option<BodyStats>, DbError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM body_stats WHERE user_id = ?",
                [user.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(data) = data else {
            return Ok(None);
        };
        let document: Value = serde_json::from_str(&data).map_err(|source| DbError::Json {
            user_id: user.to_string(),
            source,
        })?;
        tracing::debug!(user = %user, "loaded body stats");
        Ok(Some(BodyStats::from_document(&document)))
    }

    /// Loads a user's body stats, storing an empty aggregate on first use.
    pub fn fetch_or_create_body_stats(&self, user: &UserId) -> Result<BodyStats, DbError> {
        if let Some(stats) = self.fetch_body_stats(user)? {
            return Ok(stats);
        }
        tracing::debug!(user = %user, "creating body stats");
        let stats = BodyStats::default();
        self.save_body_stats(user, &stats)?;
        Ok(stats)
    }

    /// Replaces a user's stored document with `stats`.
    pub fn save_body_stats(&self, user: &UserId, stats: &BodyStats) -> Result<(), DbError> {
        self.save_body_stats_at(user, stats, Utc::now())
    }

    /// Replaces a user's stored document, stamping it with `saved_at`.
    pub fn save_body_stats_at(
        &self,
        user: &UserId,
        stats: &BodyStats,
        saved_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let data = serde_json::to_string(stats).map_err(|source| DbError::Json {
            user_id: user.to_string(),
            source,
        })?;
        let saved_at = format_timestamp(saved_at);
        self.conn.execute(
            "
            INSERT INTO body_stats (user_id, data, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            ",
            params![user.as_str(), data, saved_at],
        )?;
        tracing::debug!(user = %user, "saved body stats");
        Ok(())
    }

    /// Lists every stored user, most recently saved first.
    pub fn list_users(&self) -> Result<Vec<UserRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT user_id, created_at, updated_at
            FROM body_stats
            ORDER BY updated_at DESC, user_id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut users = Vec::new();
        for row in rows {
            let (user_id, created_at, updated_at) = row?;
            users.push(UserRecord {
                created_at: parse_timestamp(&created_at, &user_id)?,
                updated_at: parse_timestamp(&updated_at, &user_id)?,
                user_id,
            });
        }
        Ok(users)
    }
}

fn parse_timestamp(timestamp: &str, user_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            user_id: user_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
