use crate::error::ProgressError;
use crate::models::ProgressSnapshot;
use crate::progress::{ProgressStore, decode_snapshot};
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Progress kept in a single-row SQLite table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self, ProgressError> {
        Ok(Self {
            conn: super::open_db(db_path)?,
        })
    }

    pub fn from_connection(conn: Connection) -> Result<Self, ProgressError> {
        super::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.conn
            .query_row("SELECT updated_at FROM progress WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .ok()
            .flatten()
    }
}

impl ProgressStore for SqliteStore {
    fn load(&mut self) -> Option<ProgressSnapshot> {
        let raw: Option<String> = match self
            .conn
            .query_row("SELECT snapshot FROM progress WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cannot read saved progress: {}", e);
                None
            }
        };

        raw.as_deref().and_then(decode_snapshot)
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError> {
        let data = serde_json::to_string(snapshot)?;
        let updated_at = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO progress (id, difficulty, snapshot, answered, total, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                difficulty = excluded.difficulty,
                snapshot = excluded.snapshot,
                answered = excluded.answered,
                total = excluded.total,
                updated_at = excluded.updated_at",
            rusqlite::params![
                snapshot.difficulty.as_str(),
                data,
                snapshot.answered_count() as i64,
                snapshot.questions.len() as i64,
                updated_at
            ],
        )?;
        debug!("Saved progress row at {}", updated_at);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        self.conn.execute("DELETE FROM progress", [])?;
        Ok(())
    }
}
