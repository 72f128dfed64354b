//! Write-time record validation.
//!
//! Repositories run [`validate_record`] on every insert and update. Nothing
//! on the read path validates, so legacy rows that break these rules still
//! aggregate (their nets clamp at zero).

use chrono::NaiveDate;
use serde_json::Value;

use crate::catalog::ExamType;
use crate::error::ValidationError;
use crate::model::{field_key, ExamRecord, ScoreField};

/// Check a record against its catalog. `today` is the latest allowed date.
pub fn validate_record(record: &ExamRecord, today: NaiveDate) -> Result<ExamType, ValidationError> {
    let exam_type = record.parse_exam_type()?;

    if record.exam_date > today {
        return Err(ValidationError::FutureDate {
            date: record.exam_date,
        });
    }

    let prefix = exam_type.prefix();
    for subject in exam_type.subjects() {
        for field in ScoreField::ALL {
            let key = field_key(prefix, subject.id, field);
            if let Some(value) = record.fields.get(&key) {
                check_count(&key, value)?;
            }
        }

        let score = record.score(prefix, subject.id);
        if score.total() > u64::from(subject.max_questions) {
            return Err(ValidationError::SubjectOverflow {
                subject: subject.id.to_string(),
                total: score.total(),
                max: subject.max_questions,
            });
        }
    }

    Ok(exam_type)
}

fn check_count(key: &str, value: &Value) -> Result<(), ValidationError> {
    let valid = match value {
        Value::Null => true,
        Value::Number(n) => n.as_u64().is_some(),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidCount {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
