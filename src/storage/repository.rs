//! Repository pattern wrapper for the recency store
//!
//! Provides the "item was opened" flow on top of the raw row operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::storage::{MruRecord, RecencyStore};

/// Repository for recently viewed items
pub struct Repository<'a> {
    store: &'a mut RecencyStore,
    capacity: usize,
}

impl<'a> Repository<'a> {
    /// Create a repository keeping at most `capacity` items.
    ///
    /// The item just opened is always kept, so a capacity of 0 acts as 1.
    pub fn new(store: &'a mut RecencyStore, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    /// Record that an item was opened.
    ///
    /// An existing entry with the same reference is moved to the front,
    /// otherwise a new one is inserted. The list is then trimmed to capacity.
    pub fn record_visit(
        &mut self,
        title: String,
        id_ref: String,
        start_time: DateTime<Utc>,
    ) -> Result<MruRecord> {
        let db = self.store.database()?;

        let record = match db.find_mru_by_ref(&id_ref)? {
            Some(mut existing) => {
                existing.last_looked_at = Utc::now();
                db.touch_mru(existing.id, existing.last_looked_at)?;
                debug!(id = existing.id, "Moved recent item to front");
                existing
            }
            None => {
                let mut record = MruRecord::new(title, id_ref, start_time);
                record.id = db.insert_mru(&record)?;
                debug!(id = record.id, "Added recent item");
                record
            }
        };

        let removed = db.prune_mru(self.capacity)?;
        if removed > 0 {
            debug!(removed, "Trimmed recent items to capacity");
        }

        Ok(record)
    }

    /// Most recently opened items first
    pub fn recent(&mut self, limit: usize) -> Result<Vec<MruRecord>> {
        self.store.database()?.list_recent(limit)
    }

    /// Get an item by ID
    pub fn get(&mut self, id: i64) -> Result<Option<MruRecord>> {
        self.store.database()?.get_mru(id)
    }

    /// Mark an existing item as opened now
    pub fn reopen(&mut self, id: i64) -> Result<bool> {
        self.store.database()?.touch_mru(id, Utc::now())
    }

    /// Remove an item from the list
    pub fn forget_item(&mut self, id: i64) -> Result<bool> {
        self.store.database()?.delete_mru(id)
    }

    /// Trim to the `keep` most recent items
    pub fn prune(&mut self, keep: usize) -> Result<usize> {
        self.store.database()?.prune_mru(keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn start() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn revisiting_an_item_does_not_duplicate_it() {
        let tmp = tempdir().unwrap();
        let mut store = RecencyStore::new(tmp.path().join("indico.db"));
        let mut repo = Repository::new(&mut store, 10);

        let first = repo
            .record_visit("Plenary".to_string(), "event:1".to_string(), start())
            .unwrap();
        repo.record_visit("Other".to_string(), "event:2".to_string(), start())
            .unwrap();
        let again = repo
            .record_visit("Plenary".to_string(), "event:1".to_string(), start())
            .unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(repo.recent(10).unwrap().len(), 2);
    }

    #[test]
    fn visits_are_trimmed_to_capacity() {
        let tmp = tempdir().unwrap();
        let mut store = RecencyStore::new(tmp.path().join("indico.db"));
        let mut repo = Repository::new(&mut store, 3);

        for i in 0..5 {
            repo.record_visit(format!("Event {}", i), format!("event:{}", i), start())
                .unwrap();
        }

        let recent = repo.recent(10).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id_ref, "event:4");
    }

    #[test]
    fn revisit_within_the_same_second_survives_trimming() {
        let tmp = tempdir().unwrap();
        let mut store = RecencyStore::new(tmp.path().join("indico.db"));
        let mut repo = Repository::new(&mut store, 2);

        for id_ref in ["a", "b", "a", "c"] {
            repo.record_visit(id_ref.to_uppercase(), id_ref.to_string(), start())
                .unwrap();
        }

        let kept: Vec<String> = repo
            .recent(10)
            .unwrap()
            .into_iter()
            .map(|r| r.id_ref)
            .collect();
        assert_eq!(kept, vec!["c", "a"]);
    }

    #[test]
    fn zero_capacity_still_keeps_the_opened_item() {
        let tmp = tempdir().unwrap();
        let mut store = RecencyStore::new(tmp.path().join("indico.db"));
        let mut repo = Repository::new(&mut store, 0);

        repo.record_visit("First".to_string(), "event:1".to_string(), start())
            .unwrap();
        let opened = repo
            .record_visit("Second".to_string(), "event:2".to_string(), start())
            .unwrap();

        assert_eq!(repo.get(opened.id).unwrap(), Some(opened));
        assert_eq!(repo.recent(10).unwrap().len(), 1);
    }

    #[test]
    fn forgetting_an_unknown_item_reports_false() {
        let tmp = tempdir().unwrap();
        let mut store = RecencyStore::new(tmp.path().join("indico.db"));
        let mut repo = Repository::new(&mut store, 3);

        assert!(!repo.forget_item(99).unwrap());
        assert!(!repo.reopen(99).unwrap());
        assert!(repo.get(99).unwrap().is_none());
    }
}
