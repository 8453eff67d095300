//! In-process row store.

use super::{StoreError, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use roster_engine::{NewUser, RowId, UserPatch, UserRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug)]
struct Table {
    rows: BTreeMap<RowId, UserRecord>,
    next_id: RowId,
}

/// Row store kept in memory, with auto-increment ids starting at 1.
///
/// Used when no database is configured and by tests. [`set_failing`] makes
/// every call fail with [`StoreError::Unavailable`] and [`set_latency`]
/// delays every call.
///
/// [`set_failing`]: MemoryUserStore::set_failing
/// [`set_latency`]: MemoryUserStore::set_latency
#[derive(Debug)]
pub struct MemoryUserStore {
    table: Mutex<Table>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
            failing: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
        }
    }

    /// Toggle simulated store failures.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    async fn check(&self) -> Result<(), StoreError> {
        let millis = self.latency_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.check().await?;
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, StoreError> {
        self.check().await?;
        let mut table = self.table.lock().await;

        let record = UserRecord {
            id: table.next_id,
            name: user.name.clone(),
            age: user.age,
            email: user.email.clone(),
            last_updated: Utc::now(),
        };
        table.next_id += 1;
        table.rows.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update(&self, patch: &UserPatch) -> Result<(), StoreError> {
        self.check().await?;
        let mut table = self.table.lock().await;

        let record = table
            .rows
            .get_mut(&patch.id)
            .ok_or(StoreError::NotFound(patch.id))?;
        patch.apply_to(record);
        record.last_updated = Utc::now();

        Ok(())
    }

    async fn delete(&self, id: RowId) -> Result<u64, StoreError> {
        self.check().await?;
        let mut table = self.table.lock().await;
        Ok(table.rows.remove(&id).map_or(0, |_| 1))
    }
}
