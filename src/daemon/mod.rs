//! Daemon module for indico-store
//!
//! Stands in for the platform's background task dispatcher: keeps calling
//! the maintenance task on a fixed interval.

pub mod scheduler;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::maintenance::{MaintenanceTask, SqliteBlobCache};

pub use scheduler::run_scheduler;

/// Build the maintenance task for the configured blob cache
pub fn maintenance_task(settings: &Settings) -> MaintenanceTask {
    MaintenanceTask::new(Arc::new(SqliteBlobCache::new(settings.blob_cache_path())))
}

/// Run the scheduler in the foreground until Ctrl-C
pub async fn run_foreground(settings: &Settings) -> Result<()> {
    settings.ensure_dirs()?;

    let period = settings.maintenance_interval();
    info!(
        cache = %settings.blob_cache_path().display(),
        interval_secs = period.as_secs(),
        "Starting maintenance scheduler"
    );

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    run_scheduler(maintenance_task(settings), period, shutdown).await?;

    Ok(())
}
