//! In-process repository for tests and demos.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

use netrack_core::model::{ExamRecord, ExamUpdate};
use netrack_core::traits::{ChangeEvent, ChangeKind, ExamRepository};

use crate::table;
use crate::CHANGE_CHANNEL_CAPACITY;

/// Keeps every user's records in memory.
///
/// Counts `list` calls so tests can assert that a view re-fetched.
pub struct MemoryStore {
    records: Mutex<Vec<ExamRecord>>,
    fetch_count: AtomicU32,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seed the store without validation or change events.
    pub fn with_records(records: Vec<ExamRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fetch_count: AtomicU32::new(0),
            events: broadcast::channel(CHANGE_CHANNEL_CAPACITY).0,
        }
    }

    /// Number of `list` calls made so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    fn announce(&self, user_id: &str, record_id: &str, kind: ChangeKind) {
        tracing::debug!(user = user_id, record = record_id, %kind, "memory store changed");
        // No subscribers is fine.
        let _ = self
            .events
            .send(ChangeEvent::exams(user_id, record_id, kind));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExamRepository for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<ExamRecord>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        let records = self.records.lock().await;
        Ok(table::list_for(&records, user_id))
    }

    async fn insert(&self, user_id: &str, record: ExamRecord) -> anyhow::Result<ExamRecord> {
        let stored = {
            let mut records = self.records.lock().await;
            table::insert_into(&mut records, user_id, record)?
        };
        self.announce(user_id, &stored.id, ChangeKind::Insert);
        Ok(stored)
    }

    async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: &ExamUpdate,
    ) -> anyhow::Result<ExamRecord> {
        let stored = {
            let mut records = self.records.lock().await;
            table::update_in(&mut records, user_id, id, update)?
        };
        self.announce(user_id, id, ChangeKind::Update);
        Ok(stored)
    }

    async fn delete(&self, user_id: &str, id: &str) -> anyhow::Result<()> {
        {
            let mut records = self.records.lock().await;
            table::delete_from(&mut records, user_id, id)?;
        }
        self.announce(user_id, id, ChangeKind::Delete);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}
