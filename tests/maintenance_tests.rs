use anyhow::Result;
use std::sync::Arc;
use tempfile::tempdir;

use indico_store::maintenance::{BlobCache, MaintenanceTask, SqliteBlobCache};

#[test]
fn running_twice_on_empty_cache_is_fine() -> Result<()> {
    let tmp = tempdir()?;
    let cache = Arc::new(SqliteBlobCache::new(tmp.path().join("blobcache.db")));
    let task = MaintenanceTask::new(cache.clone());

    task.run();
    task.run();

    let report = cache.compact()?;
    assert_eq!(report.reclaimed(), 0);
    Ok(())
}

#[test]
fn unusable_cache_path_does_not_escape_run() -> Result<()> {
    let tmp = tempdir()?;
    // A directory where the cache file should be makes every open fail
    let path = tmp.path().join("blobcache.db");
    std::fs::create_dir(&path)?;

    let cache = Arc::new(SqliteBlobCache::new(&path));
    assert!(cache.compact().is_err());

    MaintenanceTask::new(cache).run();
    Ok(())
}
