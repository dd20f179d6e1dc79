//! Owner of the recency database handle
//!
//! [`RecencyStore`] is built once by the composition root and handed to
//! whoever needs the recently viewed items. The SQLite connection is opened
//! lazily on first access and can be released with [`RecencyStore::forget`],
//! which the destructive reset uses before removing the backing file.

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::storage::Database;

/// Removal of the files backing the store.
///
/// Lets tests simulate a platform that refuses to delete a locked file.
pub trait BackingFile: Send + Sync {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Removes files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBackingFile;

impl BackingFile for FsBackingFile {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// How [`RecencyStore::delete_database`] ended up clearing the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The backing file was removed
    Deleted,
    /// There was no backing file to remove
    AlreadyAbsent,
    /// Removal was denied, tables were recreated in place instead
    ResetInPlace,
}

/// Lazily opened handle to the recency database
pub struct RecencyStore {
    path: PathBuf,
    db: Option<Database>,
    files: Box<dyn BackingFile>,
}

impl RecencyStore {
    /// Bind a store to a database path. No I/O happens until first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_backing_file(path, FsBackingFile)
    }

    /// Bind a store with a custom file removal strategy
    pub fn with_backing_file(path: impl Into<PathBuf>, files: impl BackingFile + 'static) -> Self {
        Self {
            path: path.into(),
            db: None,
            files: Box::new(files),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a connection is currently open
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Open the backing file if needed and ensure the schema exists.
    ///
    /// Safe to call repeatedly.
    pub fn create(&mut self) -> Result<&Database> {
        if self.db.is_none() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory: {}", parent.display())
                    })?;
                }
            }

            debug!(path = %self.path.display(), "Opening recency database");
            self.db = Some(Database::open_path(&self.path)?);
        }

        self.db
            .as_ref()
            .context("Recency database handle missing after open")
    }

    /// The open database, opened on first access
    pub fn database(&mut self) -> Result<&Database> {
        self.create()
    }

    /// Drop and recreate the schema in place
    pub fn reset_tables(&mut self) -> Result<()> {
        self.create()?.reset_tables()
    }

    /// Close and release the handle. The next access reopens the file.
    pub fn forget(&mut self) {
        if let Some(db) = self.db.take() {
            debug!(path = %self.path.display(), "Releasing recency database");
            // A failed close has already released the handle on drop
            let _ = db.close();
        }
    }

    /// Forget the handle and open a fresh one against the current file
    pub fn reset(&mut self) -> Result<&Database> {
        self.forget();
        self.create()
    }

    /// Remove the backing file outright.
    ///
    /// A missing file counts as success. If the platform denies the removal
    /// the tables are recreated in place so the store still ends up empty and
    /// valid. Any other failure is returned.
    pub fn delete_database(&mut self) -> Result<DeleteOutcome> {
        self.forget();

        let outcome = match self.files.remove(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Deleted recency database");
                DeleteOutcome::Deleted
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No recency database to delete");
                DeleteOutcome::AlreadyAbsent
            }
            Err(e) if is_denied(&e) => {
                warn!(
                    path = %self.path.display(),
                    "Deleting recency database denied ({}), resetting tables instead",
                    e
                );
                self.reset_tables()?;
                return Ok(DeleteOutcome::ResetInPlace);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to delete database: {}", self.path.display())
                });
            }
        };

        self.remove_journal()?;
        Ok(outcome)
    }

    fn remove_journal(&self) -> Result<()> {
        let mut journal = self.path.clone().into_os_string();
        journal.push("-journal");
        let journal = PathBuf::from(journal);

        match self.files.remove(&journal) {
            Ok(()) => {
                debug!(path = %journal.display(), "Deleted leftover journal");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to delete journal: {}", journal.display())),
        }
    }
}

/// Removal refused because the file is locked or in use
fn is_denied(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) {
        return true;
    }

    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return true;
    }

    false
}

impl Drop for RecencyStore {
    fn drop(&mut self) {
        self.forget();
    }
}
