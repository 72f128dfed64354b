//! Repository trait and change notifications.
//!
//! `ExamRepository` is implemented by the `netrack-store` crate. Every
//! successful mutation is announced on a broadcast channel so that views
//! can re-fetch and recompute.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::{ExamRecord, ExamUpdate};

/// Table name carried by exam change events.
pub const EXAMS_TABLE: &str = "exams";

// ---------------------------------------------------------------------------
// Repository trait
// ---------------------------------------------------------------------------

/// Persistence backend for exam records, scoped per user.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// All records of `user_id`, newest exam date first.
    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<ExamRecord>>;

    /// Store a new record for `user_id` and return it as persisted.
    async fn insert(&self, user_id: &str, record: ExamRecord) -> anyhow::Result<ExamRecord>;

    /// Apply a partial update to one of `user_id`'s records.
    async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: &ExamUpdate,
    ) -> anyhow::Result<ExamRecord>;

    /// Delete one of `user_id`'s records.
    async fn delete(&self, user_id: &str, id: &str) -> anyhow::Result<()>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

/// Kind of mutation announced by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Insert => write!(f, "insert"),
            ChangeKind::Update => write!(f, "update"),
            ChangeKind::Delete => write!(f, "delete"),
        }
    }
}

/// "Table X changed for user Y."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub user_id: String,
    pub record_id: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn exams(user_id: &str, record_id: &str, kind: ChangeKind) -> Self {
        Self {
            table: EXAMS_TABLE.to_string(),
            user_id: user_id.to_string(),
            record_id: record_id.to_string(),
            kind,
        }
    }

    /// Whether this event invalidates `user_id`'s exam list.
    pub fn affects_exams_of(&self, user_id: &str) -> bool {
        self.table == EXAMS_TABLE && self.user_id == user_id
    }
}

/// Sort records newest exam date first (stable for equal dates).
pub fn sort_newest_first(records: &mut [ExamRecord]) {
    records.sort_by(|a, b| b.exam_date.cmp(&a.exam_date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ExamType;

    #[test]
    fn event_scope() {
        let event = ChangeEvent::exams("u1", "r1", ChangeKind::Insert);
        assert!(event.affects_exams_of("u1"));
        assert!(!event.affects_exams_of("u2"));

        let other = ChangeEvent {
            table: "todos".into(),
            ..event
        };
        assert!(!other.affects_exams_of("u1"));
    }

    #[test]
    fn change_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::Delete).unwrap(),
            "\"delete\""
        );
        assert_eq!(ChangeKind::Update.to_string(), "update");
    }

    #[test]
    fn newest_first_ordering() {
        let mut records = vec![
            ExamRecord::new(ExamType::Tyt, "2024-01-01".parse().unwrap()).with_id("old"),
            ExamRecord::new(ExamType::Tyt, "2024-03-01".parse().unwrap()).with_id("new"),
            ExamRecord::new(ExamType::Tyt, "2024-02-01".parse().unwrap()).with_id("mid"),
        ];
        sort_newest_first(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
