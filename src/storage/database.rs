//! SQLite database holding the recently viewed items

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, warn};

use crate::storage::models::MruRecord;
use crate::Error;

/// Database wrapper for the recency store
pub struct Database {
    conn: Connection,
}

const CURRENT_SCHEMA_VERSION: i64 = 2;

const NANOS_PER_SEC: i64 = 1_000_000_000;

const MRU_COLUMNS: &str = "id, title, start_time, last_looked_at, id_ref";

impl Database {
    /// Open database at a specific path, creating file and schema if absent
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Close the connection now instead of on drop.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, err)| {
            warn!("Closing database failed: {}", err);
            anyhow::Error::from(err).context("Failed to close database")
        })
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<()> {
        let current_version = self.schema_version()?;
        if current_version > CURRENT_SCHEMA_VERSION {
            anyhow::bail!(
                "Database schema version {} is newer than supported version {}",
                current_version,
                CURRENT_SCHEMA_VERSION
            );
        }

        if current_version < 1 {
            self.migrate_to_v1()?;
            self.set_schema_version(1)?;
        }

        if current_version < 2 {
            self.migrate_to_v2()?;
            self.set_schema_version(2)?;
        }

        Ok(())
    }

    /// Current schema version tracked in PRAGMA user_version.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?)
    }

    fn set_schema_version(&self, version: i64) -> Result<()> {
        self.conn
            .execute_batch(&format!("PRAGMA user_version = {};", version))?;
        Ok(())
    }

    fn migrate_to_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS mru (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (length(title) <= 40),
                start_time INTEGER NOT NULL,
                last_looked_at INTEGER NOT NULL,
                id_ref TEXT NOT NULL CHECK (length(id_ref) <= 256)
            );

            CREATE INDEX IF NOT EXISTS idx_mru_last_looked_at
                ON mru(last_looked_at DESC);
            CREATE INDEX IF NOT EXISTS idx_mru_id_ref
                ON mru(id_ref);
            "#,
        )?;

        Ok(())
    }

    // v1 stored whole seconds, v2 stores nanoseconds so visits within the
    // same second keep their order.
    fn migrate_to_v2(&self) -> Result<()> {
        self.conn.execute(
            "UPDATE mru SET start_time = start_time * ?1, last_looked_at = last_looked_at * ?1",
            params![NANOS_PER_SEC],
        )?;
        Ok(())
    }

    /// Whether the MRU table exists in the current file
    pub fn has_schema(&self) -> Result<bool> {
        let name: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'mru'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.is_some())
    }

    /// Drop and recreate the schema in place, discarding every row
    pub fn reset_tables(&self) -> Result<()> {
        debug!("Dropping recency tables");

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            r#"
            DROP INDEX IF EXISTS idx_mru_last_looked_at;
            DROP INDEX IF EXISTS idx_mru_id_ref;
            DROP TABLE IF EXISTS mru;
            PRAGMA user_version = 0;
            "#,
        )?;
        tx.commit()?;

        self.initialize()
    }

    /// Insert a record and return the id assigned by the store
    pub fn insert_mru(&self, record: &MruRecord) -> Result<i64> {
        record.validate()?;

        self.conn.execute(
            r#"
            INSERT INTO mru (title, start_time, last_looked_at, id_ref)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.title,
                to_nanos(record.start_time)?,
                to_nanos(record.last_looked_at)?,
                record.id_ref,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get a record by ID
    pub fn get_mru(&self, id: i64) -> Result<Option<MruRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {} FROM mru WHERE id = ?1", MRU_COLUMNS),
                params![id],
                Self::row_to_mru,
            )
            .optional()?;

        Ok(record)
    }

    /// Find the most recent record pointing at an external reference
    pub fn find_mru_by_ref(&self, id_ref: &str) -> Result<Option<MruRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM mru WHERE id_ref = ?1
                     ORDER BY last_looked_at DESC, id DESC
                     LIMIT 1",
                    MRU_COLUMNS
                ),
                params![id_ref],
                Self::row_to_mru,
            )
            .optional()?;

        Ok(record)
    }

    /// List records, most recently looked at first
    pub fn list_recent(&self, limit: usize) -> Result<Vec<MruRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM mru
             ORDER BY last_looked_at DESC, id DESC
             LIMIT ?1",
            MRU_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![limit as i64], Self::row_to_mru)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Mark a record as looked at. Returns false if no such record exists.
    pub fn touch_mru(&self, id: i64, at: DateTime<Utc>) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE mru SET last_looked_at = ?2 WHERE id = ?1",
            params![id, to_nanos(at)?],
        )?;
        Ok(updated > 0)
    }

    /// Delete a record. Returns false if no such record exists.
    pub fn delete_mru(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM mru WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Keep only the `keep` most recent records, returning how many were removed
    pub fn prune_mru(&self, keep: usize) -> Result<usize> {
        let removed = self.conn.execute(
            r#"
            DELETE FROM mru WHERE id NOT IN (
                SELECT id FROM mru
                ORDER BY last_looked_at DESC, id DESC
                LIMIT ?1
            )
            "#,
            params![keep as i64],
        )?;
        Ok(removed)
    }

    /// Number of stored records
    pub fn count_mru(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM mru", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_mru(row: &rusqlite::Row) -> rusqlite::Result<MruRecord> {
        Ok(MruRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            start_time: timestamp_column(row, 2)?,
            last_looked_at: timestamp_column(row, 3)?,
            id_ref: row.get(4)?,
        })
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let last_looked_at: Option<i64> = self
            .conn
            .query_row("SELECT MAX(last_looked_at) FROM mru", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(DatabaseStats {
            schema_version: self.schema_version()?,
            total_items: self.count_mru()?,
            last_looked_at: last_looked_at.and_then(from_nanos),
        })
    }
}

fn to_nanos(at: DateTime<Utc>) -> crate::Result<i64> {
    at.timestamp_nanos_opt()
        .ok_or_else(|| Error::InvalidRecord(format!("timestamp {} cannot be stored", at)))
}

fn from_nanos(nanos: i64) -> Option<DateTime<Utc>> {
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, subsec)
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let nanos: i64 = row.get(idx)?;
    from_nanos(nanos).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, nanos))
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub schema_version: i64,
    pub total_items: usize,
    pub last_looked_at: Option<DateTime<Utc>>,
}
