//! Maintenance module for indico-store
//!
//! Reclaims space in the blob cache. Scheduling belongs to the caller.

mod blob_cache;
mod task;

pub use blob_cache::{BlobCache, CompactionReport, SqliteBlobCache};
pub use task::MaintenanceTask;
