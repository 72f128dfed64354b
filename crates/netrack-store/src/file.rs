//! JSON file repository.
//!
//! All users share one document of the form `{ "exams": [...] }`. Writes go
//! to a temporary file in the same directory and are renamed over the
//! original, so a crash never leaves a half-written document behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use netrack_core::model::{ExamRecord, ExamUpdate};
use netrack_core::parser::{parse_records_str, RecordFormat};
use netrack_core::traits::{ChangeEvent, ChangeKind, ExamRepository};

use crate::table;
use crate::CHANGE_CHANNEL_CAPACITY;

#[derive(Serialize)]
struct ExamDocument<'a> {
    exams: &'a [ExamRecord],
}

/// Repository backed by a single JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
    events: broadcast::Sender<ChangeEvent>,
}

impl JsonFileStore {
    /// The file does not need to exist until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            events: broadcast::channel(CHANGE_CHANNEL_CAPACITY).0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<ExamRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_records_str(&content, RecordFormat::Json, &self.path)
    }

    fn write_all(&self, records: &[ExamRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let json = serde_json::to_string_pretty(&ExamDocument { exams: records })
            .context("failed to serialize exam records")?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Read, change, and write back under the store lock.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<ExamRecord>) -> Result<T, crate::StoreError>,
    ) -> Result<T> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all()?;
        let out = change(&mut records)?;
        self.write_all(&records)?;
        Ok(out)
    }

    fn announce(&self, user_id: &str, record_id: &str, kind: ChangeKind) {
        let _ = self
            .events
            .send(ChangeEvent::exams(user_id, record_id, kind));
    }
}

#[async_trait]
impl ExamRepository for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ExamRecord>> {
        let _guard = self.lock.lock().await;
        let records = self.read_all()?;
        Ok(table::list_for(&records, user_id))
    }

    async fn insert(&self, user_id: &str, record: ExamRecord) -> Result<ExamRecord> {
        let stored = self
            .mutate(|records| table::insert_into(records, user_id, record))
            .await?;
        tracing::debug!(id = %stored.id, path = %self.path.display(), "exam inserted");
        self.announce(user_id, &stored.id, ChangeKind::Insert);
        Ok(stored)
    }

    async fn update(&self, user_id: &str, id: &str, update: &ExamUpdate) -> Result<ExamRecord> {
        let stored = self
            .mutate(|records| table::update_in(records, user_id, id, update))
            .await?;
        tracing::debug!(id, path = %self.path.display(), "exam updated");
        self.announce(user_id, id, ChangeKind::Update);
        Ok(stored)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        self.mutate(|records| table::delete_from(records, user_id, id))
            .await?;
        tracing::debug!(id, path = %self.path.display(), "exam deleted");
        self.announce(user_id, id, ChangeKind::Delete);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use netrack_core::catalog::ExamType;
    use netrack_core::model::SubjectScore;

    fn tyt(day: &str, correct: u32) -> ExamRecord {
        ExamRecord::new(ExamType::Tyt, day.parse().unwrap())
            .with_score("matematik", SubjectScore::new(correct, 4, 0))
    }

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("exams.json"));
        assert!(store.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/exams.json");

        let store = JsonFileStore::new(&path);
        let first = store.insert("u1", tyt("2024-01-01", 20)).await.unwrap();
        store.insert("u1", tyt("2024-02-01", 25)).await.unwrap();
        store.insert("u2", tyt("2024-03-01", 30)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["exams"].as_array().unwrap().len(), 3);

        let reopened = JsonFileStore::new(&path);
        let listed = reopened.list("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, first.id);
        assert_eq!(listed[0].count("tyt_matematik_dogru"), 25);
    }

    #[tokio::test]
    async fn reads_bare_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exams.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "user_id": "u1", "exam_type": "TYT", "exam_date": "2024-01-05"}]"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        let listed = store.list("u1").await.unwrap();
        assert_eq!(listed[0].id, "7");
    }

    #[tokio::test]
    async fn rejected_write_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exams.json");
        let store = JsonFileStore::new(&path);
        let stored = store.insert("u1", tyt("2024-01-01", 20)).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let update = ExamUpdate::default().with_score("tyt_", "matematik", SubjectScore::new(40, 1, 0));
        let err = store.update("u1", &stored.id, &update).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Invalid(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn delete_other_users_record_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("exams.json"));
        let stored = store.insert("u1", tyt("2024-01-01", 20)).await.unwrap();

        let err = store.delete("u2", &stored.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
        assert_eq!(store.list("u1").await.unwrap().len(), 1);
    }
}
