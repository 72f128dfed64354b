//! Change-driven analytics view.
//!
//! The dashboard fetches a user's records, feeds them through the pure
//! aggregation functions, and publishes the result as an immutable snapshot.
//! When the repository announces a change for that user, it re-fetches and
//! publishes a fresh snapshot.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::catalog::ExamType;
use crate::model::ExamRecord;
use crate::report::{summarize, ExamTypeSection};
use crate::traits::{ChangeEvent, ExamRepository};

/// Analytics computed from one fetch.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub user_id: String,
    pub refreshed_at: DateTime<Utc>,
    /// Newest exam date first, as returned by the repository.
    pub records: Vec<ExamRecord>,
    pub sections: Vec<ExamTypeSection>,
}

impl DashboardSnapshot {
    pub fn from_records(user_id: &str, records: Vec<ExamRecord>) -> Self {
        let sections = summarize(&records);
        Self {
            user_id: user_id.to_string(),
            refreshed_at: Utc::now(),
            records,
            sections,
        }
    }

    pub fn section(&self, exam_type: ExamType) -> Option<&ExamTypeSection> {
        self.sections.iter().find(|s| s.exam_type == exam_type)
    }
}

/// Live analytics for one user.
pub struct Dashboard {
    repository: Arc<dyn ExamRepository>,
    user_id: String,
    snapshot: watch::Sender<Arc<DashboardSnapshot>>,
    /// Subscribed before the first fetch; handed to the invalidation task.
    events: Mutex<Option<broadcast::Receiver<ChangeEvent>>>,
}

impl Dashboard {
    /// Fetch the user's records and build the first snapshot.
    ///
    /// Changes made after this returns are picked up by
    /// [`spawn_invalidation`](Self::spawn_invalidation), even if they happen
    /// before the task is spawned.
    pub async fn load(repository: Arc<dyn ExamRepository>, user_id: &str) -> Result<Self> {
        let events = repository.subscribe();
        let records = repository.list(user_id).await?;
        let (snapshot, _) = watch::channel(Arc::new(DashboardSnapshot::from_records(
            user_id, records,
        )));

        Ok(Self {
            repository,
            user_id: user_id.to_string(),
            snapshot,
            events: Mutex::new(Some(events)),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn watch(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Re-fetch and publish a new snapshot.
    pub async fn refresh(&self) -> Result<Arc<DashboardSnapshot>> {
        let records = self.repository.list(&self.user_id).await?;
        let snapshot = Arc::new(DashboardSnapshot::from_records(&self.user_id, records));
        tracing::info!(
            user = %self.user_id,
            records = snapshot.records.len(),
            backend = self.repository.name(),
            "dashboard refreshed"
        );
        self.snapshot.send_replace(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The receiver subscribed in [`load`](Self::load), or a fresh one if a
    /// task already took it.
    fn take_events(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| self.repository.subscribe())
    }

    /// Refresh whenever the repository reports a change to this user's exams.
    ///
    /// The task holds only a weak reference to the dashboard. It ends once
    /// the dashboard is dropped or the repository's change channel closes.
    pub fn spawn_invalidation(self: Arc<Self>) -> JoinHandle<()> {
        let mut events = self.take_events();
        let mut published = self.watch();
        let user_id = self.user_id.clone();
        let weak = Arc::downgrade(&self);
        drop(self);

        tokio::spawn(async move {
            loop {
                let changed = tokio::select! {
                    received = events.recv() => match received {
                        Ok(event) if event.affects_exams_of(&user_id) => {
                            tracing::debug!(kind = %event.kind, record = %event.record_id, "exam change");
                            true
                        }
                        Ok(_) => false,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("missed {skipped} change events, refreshing");
                            true
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    // Errors once the dashboard, and with it the sender, is gone.
                    dropped = published.changed() => {
                        if dropped.is_err() {
                            break;
                        }
                        false
                    }
                };
                if !changed {
                    continue;
                }

                let Some(dashboard) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = dashboard.refresh().await {
                    tracing::error!("dashboard refresh failed for {user_id}: {e:#}");
                }
            }
            tracing::debug!(user = %user_id, "dashboard invalidation stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExamUpdate, SubjectScore};
    use crate::traits::{sort_newest_first, ChangeEvent, ChangeKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Minimal in-memory repository for exercising the dashboard.
    struct VecRepository {
        records: Mutex<Vec<(String, ExamRecord)>>,
        events: broadcast::Sender<ChangeEvent>,
    }

    impl VecRepository {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                events: broadcast::channel(16).0,
            }
        }
    }

    #[async_trait]
    impl ExamRepository for VecRepository {
        fn name(&self) -> &str {
            "vec"
        }

        async fn list(&self, user_id: &str) -> Result<Vec<ExamRecord>> {
            let mut out: Vec<ExamRecord> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|(owner, _)| owner == user_id)
                .map(|(_, r)| r.clone())
                .collect();
            sort_newest_first(&mut out);
            Ok(out)
        }

        async fn insert(&self, user_id: &str, record: ExamRecord) -> Result<ExamRecord> {
            self.records
                .lock()
                .unwrap()
                .push((user_id.to_string(), record.clone()));
            let _ = self
                .events
                .send(ChangeEvent::exams(user_id, &record.id, ChangeKind::Insert));
            Ok(record)
        }

        async fn update(&self, _: &str, _: &str, _: &ExamUpdate) -> Result<ExamRecord> {
            anyhow::bail!("not supported")
        }

        async fn delete(&self, _: &str, _: &str) -> Result<()> {
            anyhow::bail!("not supported")
        }

        fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
            self.events.subscribe()
        }
    }

    fn tyt(day: &str, correct: u32) -> ExamRecord {
        ExamRecord::new(ExamType::Tyt, day.parse().unwrap())
            .with_score("turkce", SubjectScore::new(correct, 0, 0))
    }

    #[tokio::test]
    async fn initial_snapshot() {
        let repo = Arc::new(VecRepository::new());
        repo.insert("u1", tyt("2024-01-01", 30)).await.unwrap();
        repo.insert("u2", tyt("2024-01-01", 10)).await.unwrap();

        let dashboard = Dashboard::load(repo, "u1").await.unwrap();
        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.section(ExamType::Tyt).unwrap().stats.avg_net, 30.0);
        assert!(snapshot.section(ExamType::Ayt).is_none());
    }

    #[tokio::test]
    async fn change_event_triggers_refetch() {
        let repo = Arc::new(VecRepository::new());
        repo.insert("u1", tyt("2024-01-01", 30)).await.unwrap();

        let dashboard = Arc::new(Dashboard::load(repo.clone(), "u1").await.unwrap());
        let mut rx = dashboard.watch();
        let task = Arc::clone(&dashboard).spawn_invalidation();

        repo.insert("u1", tyt("2024-02-01", 40)).await.unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();

        let stats = rx.borrow().section(ExamType::Tyt).unwrap().stats;
        assert_eq!(stats.count, 2);
        assert_eq!(stats.trend, 10.0);
        task.abort();
    }

    #[tokio::test]
    async fn change_before_spawn_is_not_missed() {
        let repo = Arc::new(VecRepository::new());
        let dashboard = Arc::new(Dashboard::load(repo.clone(), "u1").await.unwrap());
        let mut rx = dashboard.watch();

        repo.insert("u1", tyt("2024-02-01", 40)).await.unwrap();
        let task = Arc::clone(&dashboard).spawn_invalidation();

        tokio::time::timeout(std::time::Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().records.len(), 1);
        task.abort();
    }

    #[tokio::test]
    async fn task_ends_when_dashboard_is_dropped() {
        let repo = Arc::new(VecRepository::new());
        let dashboard = Arc::new(Dashboard::load(repo.clone(), "u1").await.unwrap());
        let task = Arc::clone(&dashboard).spawn_invalidation();

        // The repository outlives the dashboard, so its channel stays open.
        drop(dashboard);
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(repo.events.receiver_count(), 0);
    }

    #[tokio::test]
    async fn task_ends_when_everything_is_dropped() {
        let repo = Arc::new(VecRepository::new());
        let dashboard = Arc::new(Dashboard::load(repo.clone(), "u1").await.unwrap());
        let task = Arc::clone(&dashboard).spawn_invalidation();

        drop(dashboard);
        drop(repo);
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn other_users_do_not_invalidate() {
        let repo = Arc::new(VecRepository::new());
        let dashboard = Arc::new(Dashboard::load(repo.clone(), "u1").await.unwrap());
        let rx = dashboard.watch();
        let task = Arc::clone(&dashboard).spawn_invalidation();

        repo.insert("u2", tyt("2024-02-01", 40)).await.unwrap();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert!(!rx.has_changed().unwrap());
        assert!(dashboard.snapshot().records.is_empty());
        task.abort();
    }
}
