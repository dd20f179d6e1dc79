//! Periodic maintenance entry point

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::maintenance::BlobCache;

/// Compacts the blob cache when the dispatcher asks for it.
///
/// Failures are logged and swallowed: a missed compaction only costs disk
/// space until the next run.
#[derive(Clone)]
pub struct MaintenanceTask {
    cache: Arc<dyn BlobCache>,
}

impl MaintenanceTask {
    pub fn new(cache: Arc<dyn BlobCache>) -> Self {
        Self { cache }
    }

    /// Run one compaction, blocking until it finishes
    pub fn run(&self) {
        let started = Instant::now();

        match self.cache.compact() {
            Ok(report) => info!(
                reclaimed_bytes = report.reclaimed(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Blob cache compacted"
            ),
            Err(e) => error!("Blob cache compaction failed: {:#}", e),
        }
    }
}
