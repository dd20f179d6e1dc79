//! Blob cache compaction

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of one compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionReport {
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl CompactionReport {
    /// Bytes given back to the filesystem
    pub fn reclaimed(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}

/// The only capability the maintenance task needs from the blob cache
pub trait BlobCache: Send + Sync {
    /// Reclaim unused space. Compacting an already compact cache succeeds.
    fn compact(&self) -> Result<CompactionReport>;
}

/// Key/blob cache kept in its own SQLite file
#[derive(Debug, Clone)]
pub struct SqliteBlobCache {
    path: PathBuf,
}

impl SqliteBlobCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open an existing cache file. The cache is owned elsewhere, so a
    /// missing file is never created here.
    fn open(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Connection::open_with_flags(&self.path, flags)
            .with_context(|| format!("Failed to open blob cache: {}", self.path.display()))
    }

    fn file_size(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

impl BlobCache for SqliteBlobCache {
    fn compact(&self) -> Result<CompactionReport> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No blob cache to compact");
            return Ok(CompactionReport {
                bytes_before: 0,
                bytes_after: 0,
            });
        }

        let bytes_before = self.file_size();

        let conn = self.open()?;
        conn.execute_batch("VACUUM;")
            .with_context(|| format!("Failed to vacuum blob cache: {}", self.path.display()))?;
        conn.close().map_err(|(_conn, err)| err)?;

        let report = CompactionReport {
            bytes_before,
            bytes_after: self.file_size(),
        };
        debug!(
            path = %self.path.display(),
            before = report.bytes_before,
            after = report.bytes_after,
            "Vacuumed blob cache"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::tempdir;

    #[test]
    fn compacting_missing_cache_leaves_it_missing() {
        let tmp = tempdir().unwrap();
        let cache = SqliteBlobCache::new(tmp.path().join("blobcache.db"));

        assert_eq!(cache.compact().unwrap().reclaimed(), 0);
        assert!(!cache.path().exists());
    }

    #[test]
    fn compaction_does_not_touch_the_cache_schema() {
        let tmp = tempdir().unwrap();
        let cache = SqliteBlobCache::new(tmp.path().join("blobcache.db"));
        let conn = Connection::open(cache.path()).unwrap();
        conn.execute_batch("CREATE TABLE images (url TEXT PRIMARY KEY, data BLOB);")
            .unwrap();
        drop(conn);

        cache.compact().unwrap();

        let conn = Connection::open(cache.path()).unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, vec!["images"]);
    }

    #[test]
    fn compaction_reclaims_deleted_blobs() {
        let tmp = tempdir().unwrap();
        let cache = SqliteBlobCache::new(tmp.path().join("blobcache.db"));

        let conn = Connection::open(cache.path()).unwrap();
        conn.execute_batch("CREATE TABLE blobs (key TEXT PRIMARY KEY, value BLOB NOT NULL);")
            .unwrap();
        let blob = vec![0xABu8; 64 * 1024];
        for i in 0..32 {
            conn.execute(
                "INSERT INTO blobs (key, value) VALUES (?1, ?2)",
                params![format!("image:{}", i), blob],
            )
            .unwrap();
        }
        conn.execute("DELETE FROM blobs", []).unwrap();
        drop(conn);

        let report = cache.compact().unwrap();
        assert!(report.reclaimed() > 0);
        assert!(report.bytes_after < report.bytes_before);
    }
}
