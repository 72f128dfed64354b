//! Record-list operations shared by the in-process backends.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use netrack_core::model::{ExamRecord, ExamUpdate};
use netrack_core::traits::sort_newest_first;
use netrack_core::validate::validate_record;

use crate::error::StoreError;

/// Latest exam date accepted on write.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn owned_by(record: &ExamRecord, user_id: &str) -> bool {
    record.user_id.as_deref() == Some(user_id)
}

/// `user_id`'s records, newest exam date first.
pub(crate) fn list_for(records: &[ExamRecord], user_id: &str) -> Vec<ExamRecord> {
    let mut out: Vec<ExamRecord> = records
        .iter()
        .filter(|r| owned_by(r, user_id))
        .cloned()
        .collect();
    sort_newest_first(&mut out);
    out
}

/// Validate and append a record, stamping owner and insertion time.
pub(crate) fn insert_into(
    records: &mut Vec<ExamRecord>,
    user_id: &str,
    mut record: ExamRecord,
) -> Result<ExamRecord, StoreError> {
    let exam_type = validate_record(&record, today())?;
    record.exam_type = exam_type.tag().to_string();

    if record.id.is_empty() {
        record.id = Uuid::new_v4().to_string();
    }
    if records.iter().any(|r| r.id == record.id) {
        return Err(StoreError::Duplicate(record.id));
    }

    record.user_id = Some(user_id.to_string());
    record.created_at.get_or_insert_with(Utc::now);
    records.push(record.clone());
    Ok(record)
}

/// Validate the merged record before replacing the stored one.
pub(crate) fn update_in(
    records: &mut [ExamRecord],
    user_id: &str,
    id: &str,
    update: &ExamUpdate,
) -> Result<ExamRecord, StoreError> {
    let stored = records
        .iter_mut()
        .find(|r| r.id == id && owned_by(r, user_id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    let mut merged = stored.clone();
    update.apply_to(&mut merged);
    validate_record(&merged, today())?;

    *stored = merged.clone();
    Ok(merged)
}

pub(crate) fn delete_from(
    records: &mut Vec<ExamRecord>,
    user_id: &str,
    id: &str,
) -> Result<(), StoreError> {
    let index = records
        .iter()
        .position(|r| r.id == id && owned_by(r, user_id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    records.remove(index);
    Ok(())
}
