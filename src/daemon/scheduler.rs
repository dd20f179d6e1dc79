//! Interval loop driving the maintenance task

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::maintenance::MaintenanceTask;

/// Run `task` every `period` until `shutdown` resolves.
///
/// The first run happens immediately. Runs execute one at a time on the
/// blocking pool and a run in progress is always allowed to finish before
/// shutdown is observed. Returns the number of completed runs.
pub async fn run_scheduler<F>(task: MaintenanceTask, period: Duration, shutdown: F) -> Result<u64>
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut runs = 0u64;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(runs, "Maintenance scheduler stopping");
                break;
            }
            _ = ticker.tick() => {
                debug!("Starting scheduled maintenance");
                let task = task.clone();
                tokio::task::spawn_blocking(move || task.run()).await?;
                runs += 1;
            }
        }
    }

    Ok(runs)
}
