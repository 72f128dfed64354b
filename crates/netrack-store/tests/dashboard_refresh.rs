//! The dashboard re-fetches after store mutations and ignores other users.

use std::sync::Arc;
use std::time::Duration;

use netrack_core::catalog::ExamType;
use netrack_core::dashboard::Dashboard;
use netrack_core::model::{ExamRecord, ExamUpdate, SubjectScore};
use netrack_core::traits::ExamRepository;
use netrack_store::{JsonFileStore, MemoryStore};

fn tyt(day: &str, turkce: u32, wrong: u32) -> ExamRecord {
    ExamRecord::new(ExamType::Tyt, day.parse().unwrap())
        .with_score("turkce", SubjectScore::new(turkce, wrong, 0))
}

async fn next_snapshot(
    rx: &mut tokio::sync::watch::Receiver<Arc<netrack_core::dashboard::DashboardSnapshot>>,
) {
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("dashboard did not refresh")
        .unwrap();
}

#[tokio::test]
async fn insert_update_delete_refresh_the_dashboard() {
    let store = Arc::new(MemoryStore::new());
    store.insert("u1", tyt("2024-01-10", 30, 8)).await.unwrap();

    let dashboard = Arc::new(Dashboard::load(store.clone(), "u1").await.unwrap());
    assert_eq!(store.fetch_count(), 1);
    let mut rx = dashboard.watch();
    let task = Arc::clone(&dashboard).spawn_invalidation();

    let second = store.insert("u1", tyt("2024-02-10", 36, 4)).await.unwrap();
    next_snapshot(&mut rx).await;
    {
        let snapshot = rx.borrow_and_update().clone();
        let stats = snapshot.section(ExamType::Tyt).unwrap().stats;
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max_net, 35.0);
        assert_eq!(stats.min_net, 28.0);
        assert_eq!(stats.trend, 7.0);
    }

    let update = ExamUpdate::default().with_score("tyt_", "turkce", SubjectScore::new(20, 0, 0));
    store.update("u1", &second.id, &update).await.unwrap();
    next_snapshot(&mut rx).await;
    assert_eq!(
        rx.borrow_and_update().section(ExamType::Tyt).unwrap().stats.trend,
        -8.0
    );

    store.delete("u1", &second.id).await.unwrap();
    next_snapshot(&mut rx).await;
    assert_eq!(rx.borrow_and_update().records.len(), 1);

    assert_eq!(store.fetch_count(), 4);
    task.abort();
}

#[tokio::test]
async fn other_users_changes_do_not_refetch() {
    let store = Arc::new(MemoryStore::new());
    let dashboard = Arc::new(Dashboard::load(store.clone(), "u1").await.unwrap());
    let task = Arc::clone(&dashboard).spawn_invalidation();

    store.insert("u2", tyt("2024-01-10", 30, 8)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(store.fetch_count(), 1);
    assert!(dashboard.snapshot().sections.is_empty());
    task.abort();
}

#[tokio::test]
async fn rejected_write_keeps_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let dashboard = Arc::new(Dashboard::load(store.clone(), "u1").await.unwrap());
    let rx = dashboard.watch();
    let task = Arc::clone(&dashboard).spawn_invalidation();

    let future = ExamRecord::new(ExamType::Tyt, "2999-01-01".parse().unwrap());
    assert!(store.insert("u1", future).await.is_err());
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!rx.has_changed().unwrap());
    assert_eq!(store.fetch_count(), 1);
    task.abort();
}

#[tokio::test]
async fn file_store_drives_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("exams.json")));

    let dashboard = Arc::new(Dashboard::load(store.clone(), "u1").await.unwrap());
    let mut rx = dashboard.watch();
    let task = Arc::clone(&dashboard).spawn_invalidation();

    store.insert("u1", tyt("2024-03-01", 32, 0)).await.unwrap();
    next_snapshot(&mut rx).await;
    let snapshot = dashboard.snapshot();
    let section = snapshot.section(ExamType::Tyt).unwrap();
    assert_eq!(section.stats.avg_net, 32.0);
    assert_eq!(section.series[0].date, "01.03");
    task.abort();
}
