use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{
    NewWaitlistEntry, StoreError, StoreRejection, StoreResult, WaitlistRow, WaitlistStore,
    UNIQUE_VIOLATION,
};

/// In-process waitlist table with the same uniqueness constraint on `email`
/// as the hosted one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<WaitlistRow>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following insert fail as if the store could not be reached.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of all stored rows, in insertion order.
    pub fn rows(&self) -> Vec<WaitlistRow> {
        self.lock_rows().clone()
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<WaitlistRow>> {
        // A panic while holding the lock can't leave a half-written row behind.
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    async fn insert_entry(&self, entry: &NewWaitlistEntry) -> StoreResult<Option<WaitlistRow>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }

        let mut rows = self.lock_rows();

        if rows.iter().any(|row| row.email == entry.email) {
            let mut rejection = StoreRejection::new(
                UNIQUE_VIOLATION,
                "duplicate key value violates unique constraint \"waitlist_email_key\"",
            );
            rejection.details = Some(format!("Key (email)=({}) already exists.", entry.email));
            return Err(StoreError::Rejected(rejection));
        }

        let mut generated = Map::new();
        generated.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        generated.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));

        let row = WaitlistRow::from_entry(entry, generated);
        rows.push(row.clone());

        Ok(Some(row))
    }
}
