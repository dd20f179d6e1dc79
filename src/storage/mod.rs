//! Storage module for indico-store
//!
//! SQLite-backed recency store plus the JSON preferences area.

mod database;
mod models;
mod preferences;
mod repository;
mod store;

pub use database::{Database, DatabaseStats};
pub use models::{MruRecord, MAX_ID_REF_LEN, MAX_TITLE_LEN};
pub use preferences::Preferences;
pub use repository::Repository;
pub use store::{BackingFile, DeleteOutcome, FsBackingFile, RecencyStore};
