//! Glimpse Storage Layer
//!
//! SQLite-backed durable store for the two append-only logs: accepted
//! screen captures and conversational turns. Schema creation is
//! idempotent and runs on every open, so a fresh database file is always
//! safe to point at.
//!
//! The API is deliberately append-only: records are created exactly once
//! and never mutated or deleted by this subsystem. Each insert is atomic
//! in isolation; no transaction ever spans both logs.
//!
//! # Examples
//!
//! ```no_run
//! use glimpse_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Both logs are now ready for appends
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use glimpse_domain::{ConversationTurn, PersistedCapture, Role};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be decoded into its domain type
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based durable store for capture and conversation logs.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers sharing a store across
/// tasks must serialize access externally (the pipeline already does).
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure both logs exist.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glimpse_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("glimpse.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Idempotent schema creation; safe to call on every startup.
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Append one accepted capture to the capture log.
    ///
    /// Returns the auto-assigned row identity. The image file at
    /// `image_path` must already exist when this is called; the pipeline
    /// orders its side effects so the log never references a missing file.
    pub fn append_capture(
        &self,
        timestamp: DateTime<Utc>,
        image_path: &Path,
        extracted_text: &str,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO captured_data (timestamp, image_path, extracted_text)
             VALUES (?1, ?2, ?3)",
            params![timestamp, image_path.to_string_lossy(), extracted_text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append one conversational turn to the conversation log.
    ///
    /// `timestamp` defaults to the current instant when omitted.
    pub fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        message: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<i64, StoreError> {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        self.conn.execute(
            "INSERT INTO conversations (session_id, timestamp, role, message)
             VALUES (?1, ?2, ?3, ?4)",
            params![session_id, timestamp, role.as_str(), message],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Read the turns of a session ordered by timestamp ascending.
    ///
    /// `limit`, when given, caps the count as the *first N in ascending
    /// order* (the oldest N turns). Callers wanting the tail of a session
    /// read without a limit.
    pub fn read_history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConversationTurn>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, timestamp, role, message
             FROM conversations WHERE session_id = ?1
             ORDER BY timestamp ASC, id ASC
             LIMIT ?2",
        )?;

        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let turns = stmt
            .query_map(params![session_id, limit], |row| {
                let role_str: String = row.get(3)?;
                let role = Role::parse(&role_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        format!("unknown role: {}", role_str).into(),
                    )
                })?;

                Ok(ConversationTurn {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    timestamp: row.get(2)?,
                    role,
                    message: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(turns)
    }

    /// List the most recent capture log entries, newest first.
    pub fn recent_captures(&self, limit: usize) -> Result<Vec<PersistedCapture>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, image_path, extracted_text
             FROM captured_data
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let captures = stmt
            .query_map(params![limit as i64], |row| {
                let path: String = row.get(2)?;
                Ok(PersistedCapture {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    image_path: PathBuf::from(path),
                    extracted_text: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(captures)
    }
}
