//! Exam record data model.
//!
//! Records keep their per-subject counts as flat, prefix-namespaced columns
//! (`tyt_matematik_dogru`, `ayt_fizik_yanlis`, ...) so rows written by any
//! client version load without migration.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{prefix_for, ExamType};
use crate::error::CatalogError;
use crate::net::calculate_net;

/// Columns stored as struct fields; never part of the flattened score map.
pub const RESERVED_COLUMNS: &[&str] = &["id", "user_id", "exam_type", "exam_date", "created_at"];

/// The three counts recorded per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreField {
    Correct,
    Wrong,
    Blank,
}

impl ScoreField {
    pub const ALL: [ScoreField; 3] = [ScoreField::Correct, ScoreField::Wrong, ScoreField::Blank];

    /// Column suffix used by the persisted format.
    pub fn suffix(self) -> &'static str {
        match self {
            ScoreField::Correct => "dogru",
            ScoreField::Wrong => "yanlis",
            ScoreField::Blank => "bos",
        }
    }
}

/// Column name for one count of one subject.
pub fn field_key(prefix: &str, subject_id: &str, field: ScoreField) -> String {
    format!("{prefix}{subject_id}_{}", field.suffix())
}

/// Read a stored count leniently: missing, null, or non-numeric values are 0,
/// negatives clamp to 0, fractions truncate.
pub fn count_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.clamp(0, i64::from(u32::MAX)) as u32
            } else if let Some(u) = n.as_u64() {
                u.min(u64::from(u32::MAX)) as u32
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.trunc().min(f64::from(u32::MAX)) as u32)
                    .unwrap_or(0)
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| i.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Correct/wrong/blank counts for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub correct: u32,
    pub wrong: u32,
    pub blank: u32,
}

impl SubjectScore {
    pub fn new(correct: u32, wrong: u32, blank: u32) -> Self {
        Self {
            correct,
            wrong,
            blank,
        }
    }

    /// Number of questions accounted for.
    pub fn total(&self) -> u64 {
        u64::from(self.correct) + u64::from(self.wrong) + u64::from(self.blank)
    }

    pub fn net(&self) -> f64 {
        calculate_net(self.correct, self.wrong)
    }
}

/// One submitted exam attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    /// Record identifier (numeric ids from older rows are stringified).
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Owner of the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Exam-type tag, kept verbatim so unknown tags still load.
    pub exam_type: String,
    /// Calendar day the exam was taken.
    pub exam_date: NaiveDate,
    /// Server-side insertion time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Every other column, including the per-subject counts.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(i) => i.to_string(),
    })
}

impl ExamRecord {
    /// Create an empty record with a fresh id.
    pub fn new(exam_type: ExamType, exam_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: None,
            exam_type: exam_type.tag().to_string(),
            exam_date,
            created_at: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set one subject's counts using this record's exam-type prefix.
    ///
    /// A record whose exam type is unknown has no prefix, so it is returned
    /// unchanged.
    pub fn with_score(mut self, subject_id: &str, score: SubjectScore) -> Self {
        if let Ok(prefix) = prefix_for(&self.exam_type) {
            self.set_score(prefix, subject_id, score);
        }
        self
    }

    pub fn set_score(&mut self, prefix: &str, subject_id: &str, score: SubjectScore) {
        for (field, value) in [
            (ScoreField::Correct, score.correct),
            (ScoreField::Wrong, score.wrong),
            (ScoreField::Blank, score.blank),
        ] {
            self.fields
                .insert(field_key(prefix, subject_id, field), Value::from(value));
        }
    }

    /// Parse the exam-type tag.
    pub fn parse_exam_type(&self) -> Result<ExamType, CatalogError> {
        self.exam_type.parse()
    }

    pub fn is_exam_type(&self, exam_type: ExamType) -> bool {
        self.parse_exam_type().is_ok_and(|t| t == exam_type)
    }

    /// Lenient count lookup for a single column.
    pub fn count(&self, key: &str) -> u32 {
        self.fields.get(key).map(count_from_value).unwrap_or(0)
    }

    /// Counts stored for a subject under the given prefix.
    pub fn score(&self, prefix: &str, subject_id: &str) -> SubjectScore {
        SubjectScore {
            correct: self.count(&field_key(prefix, subject_id, ScoreField::Correct)),
            wrong: self.count(&field_key(prefix, subject_id, ScoreField::Wrong)),
            blank: self.count(&field_key(prefix, subject_id, ScoreField::Blank)),
        }
    }

    /// Ordering key for "most recent": date, then insertion time, then id.
    pub fn recency_key(&self) -> (NaiveDate, Option<DateTime<Utc>>, &str) {
        (self.exam_date, self.created_at, self.id.as_str())
    }
}

/// A partial update to an existing record.
///
/// The exam type is fixed once a record exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl ExamUpdate {
    pub fn is_empty(&self) -> bool {
        self.exam_date.is_none() && self.fields.is_empty()
    }

    pub fn with_score(mut self, prefix: &str, subject_id: &str, score: SubjectScore) -> Self {
        self.fields.insert(
            field_key(prefix, subject_id, ScoreField::Correct),
            score.correct.into(),
        );
        self.fields.insert(
            field_key(prefix, subject_id, ScoreField::Wrong),
            score.wrong.into(),
        );
        self.fields.insert(
            field_key(prefix, subject_id, ScoreField::Blank),
            score.blank.into(),
        );
        self
    }

    /// This update with every reserved column dropped.
    ///
    /// Owner, id and exam type can never be changed through an update, so
    /// this is the only form of an update that may be sent to a backend.
    pub fn without_reserved(&self) -> ExamUpdate {
        ExamUpdate {
            exam_date: self.exam_date,
            fields: self
                .fields
                .iter()
                .filter(|(key, _)| !RESERVED_COLUMNS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Merge into `record`, leaving reserved columns untouched.
    pub fn apply_to(&self, record: &mut ExamRecord) {
        if let Some(date) = self.exam_date {
            record.exam_date = date;
        }
        for (key, value) in self.without_reserved().fields {
            record.fields.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn field_keys_follow_prefix_convention() {
        assert_eq!(
            field_key("tyt_", "matematik", ScoreField::Correct),
            "tyt_matematik_dogru"
        );
        assert_eq!(field_key("ayt_", "fizik", ScoreField::Wrong), "ayt_fizik_yanlis");
        assert_eq!(field_key("ayt_", "din", ScoreField::Blank), "ayt_din_bos");
    }

    #[test]
    fn lenient_count_parsing() {
        assert_eq!(count_from_value(&json!(12)), 12);
        assert_eq!(count_from_value(&json!(-3)), 0);
        assert_eq!(count_from_value(&json!(7.9)), 7);
        assert_eq!(count_from_value(&json!("15")), 15);
        assert_eq!(count_from_value(&json!("abc")), 0);
        assert_eq!(count_from_value(&Value::Null), 0);
        assert_eq!(count_from_value(&json!(true)), 0);
    }

    #[test]
    fn builder_writes_prefixed_counts() {
        let record = ExamRecord::new(ExamType::Tyt, date("2024-01-01"))
            .with_score("matematik", SubjectScore::new(30, 8, 2));
        assert_eq!(record.count("tyt_matematik_dogru"), 30);
        assert_eq!(record.count("tyt_matematik_yanlis"), 8);
        assert_eq!(record.count("tyt_matematik_bos"), 2);
        assert_eq!(record.score("tyt_", "matematik").net(), 28.0);
        assert_eq!(record.score("tyt_", "fen"), SubjectScore::default());
    }

    #[test]
    fn deserializes_flat_rows() {
        let row = json!({
            "id": 42,
            "user_id": "u-1",
            "exam_type": "AYT_SAYISAL",
            "exam_date": "2024-02-01",
            "created_at": "2024-02-01T10:00:00Z",
            "ayt_fizik_dogru": 10,
            "ayt_fizik_yanlis": 4,
            "note": "deneme 3"
        });
        let record: ExamRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.user_id.as_deref(), Some("u-1"));
        assert!(record.is_exam_type(ExamType::AytSayisal));
        assert_eq!(record.score("ayt_", "fizik"), SubjectScore::new(10, 4, 0));
        assert_eq!(record.fields.get("note"), Some(&json!("deneme 3")));
        assert!(!record.fields.contains_key("exam_date"));
    }

    #[test]
    fn unknown_exam_type_still_loads() {
        let row = json!({"id": "x", "exam_type": "LGS", "exam_date": "2024-01-01"});
        let record: ExamRecord = serde_json::from_value(row).unwrap();
        assert!(record.parse_exam_type().is_err());
    }

    #[test]
    fn update_merges_and_protects_reserved_columns() {
        let mut record = ExamRecord::new(ExamType::Tyt, date("2024-01-01")).with_id("r1");
        let mut update = ExamUpdate {
            exam_date: Some(date("2024-01-05")),
            ..Default::default()
        }
        .with_score("tyt_", "fen", SubjectScore::new(12, 4, 4));
        update.fields.insert("id".into(), json!("hijack"));
        update.apply_to(&mut record);

        assert_eq!(record.id, "r1");
        assert_eq!(record.exam_date, date("2024-01-05"));
        assert_eq!(record.score("tyt_", "fen"), SubjectScore::new(12, 4, 4));
        assert!(!record.fields.contains_key("id"));
        assert!(!update.is_empty());
        assert!(ExamUpdate::default().is_empty());
    }

    #[test]
    fn unknown_exam_type_gets_no_unprefixed_scores() {
        let mut record = ExamRecord::new(ExamType::Tyt, date("2024-01-01"));
        record.exam_type = "LGS".into();
        let record = record.with_score("matematik", SubjectScore::new(10, 2, 0));
        assert!(record.fields.is_empty());
        assert!(!record.fields.contains_key("matematik_dogru"));
    }

    #[test]
    fn without_reserved_drops_owner_and_type() {
        let mut update = ExamUpdate::default().with_score("tyt_", "fen", SubjectScore::new(12, 4, 4));
        for key in RESERVED_COLUMNS {
            update.fields.insert((*key).into(), json!("changed"));
        }

        let clean = update.without_reserved();
        for key in RESERVED_COLUMNS {
            assert!(!clean.fields.contains_key(*key), "{key} survived");
        }
        assert_eq!(clean.fields.len(), 3);

        let body = serde_json::to_value(&clean).unwrap();
        assert!(body.get("user_id").is_none());
        assert!(body.get("exam_type").is_none());
        assert_eq!(body["tyt_fen_dogru"], 12);
    }

    #[test]
    fn recency_prefers_date_then_created_at() {
        let a = ExamRecord::new(ExamType::Tyt, date("2024-01-01")).with_id("b");
        let mut b = ExamRecord::new(ExamType::Tyt, date("2024-01-01")).with_id("a");
        b.created_at = Some(Utc::now());
        assert!(b.recency_key() > a.recency_key());

        let c = ExamRecord::new(ExamType::Tyt, date("2024-01-02")).with_id("0");
        assert!(c.recency_key() > b.recency_key());
    }
}
