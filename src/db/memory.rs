use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::DateTime;

use super::{
    models::ShortenedUrl,
    store::{InsertOutcome, MappingStore, StoreError},
};

/// In-process stand-in for the remote table. Counts calls per operation and
/// can be told to fail or to report code conflicts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ShortenedUrl>>,
    next_id: AtomicUsize,
    pub failing: AtomicBool,
    pub forced_conflicts: AtomicUsize,
    pub inserts: AtomicUsize,
    pub deletes: AtomicUsize,
    pub selects: AtomicUsize,
    pub finds: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.failing.store(true, Ordering::SeqCst);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Seeds a row directly, bypassing the call counters.
    pub fn seed(&self, code: &str, original_url: &str) -> ShortenedUrl {
        let row = self.make_row(code, original_url);
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    pub fn codes(&self) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|row| row.code.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.selects.load(Ordering::SeqCst)
            + self.finds.load(Ordering::SeqCst)
    }

    fn make_row(&self, code: &str, original_url: &str) -> ShortenedUrl {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        ShortenedUrl {
            id,
            code: code.to_string(),
            original_url: original_url.to_string(),
            // later rows are strictly newer
            created_at: DateTime::from_timestamp(1_700_000_000 + id, 0).unwrap(),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn insert(&self, code: &str, original_url: &str) -> Result<InsertOutcome, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let forced = self
            .forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if forced || self.rows.lock().unwrap().iter().any(|row| row.code == code) {
            return Ok(InsertOutcome::Conflict);
        }

        let row = self.make_row(code, original_url);
        self.rows.lock().unwrap().push(row.clone());
        Ok(InsertOutcome::Created(row))
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.code != code);
        Ok(rows.len() != before)
    }

    async fn select_by_codes(&self, codes: &[String]) -> Result<Vec<ShortenedUrl>, StoreError> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut rows: Vec<ShortenedUrl> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| codes.contains(&row.code))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.code == code)
            .cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check()
    }
}
