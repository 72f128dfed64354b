//! Net aggregation and descriptive statistics over exam records.
//!
//! All functions here are pure: they never validate records against the
//! catalog limits, and degenerate input (missing columns, empty sets)
//! resolves to zeros.

use serde::{Deserialize, Serialize};

use crate::catalog::ExamType;
use crate::model::ExamRecord;

/// Per-subject breakdown of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectNet {
    pub subject_id: String,
    pub name: String,
    pub max_questions: u32,
    pub correct: u32,
    pub wrong: u32,
    pub blank: u32,
    pub net: f64,
    /// `100 * net / max_questions`.
    pub percentage: f64,
}

/// Descriptive statistics over the records of one exam type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub count: usize,
    pub avg_net: f64,
    pub max_net: f64,
    pub min_net: f64,
    /// Most recent total net minus the one before it.
    pub trend: f64,
}

/// Sum of subject nets for one record under the given catalog.
pub fn total_net(record: &ExamRecord, exam_type: ExamType) -> f64 {
    let prefix = exam_type.prefix();
    exam_type
        .subjects()
        .iter()
        .map(|s| record.score(prefix, s.id).net())
        .sum()
}

/// Subject nets in catalog order.
pub fn subject_nets(record: &ExamRecord, exam_type: ExamType) -> Vec<SubjectNet> {
    let prefix = exam_type.prefix();
    exam_type
        .subjects()
        .iter()
        .map(|s| {
            let score = record.score(prefix, s.id);
            let net = score.net();
            SubjectNet {
                subject_id: s.id.to_string(),
                name: s.name.to_string(),
                max_questions: s.max_questions,
                correct: score.correct,
                wrong: score.wrong,
                blank: score.blank,
                net,
                percentage: 100.0 * net / f64::from(s.max_questions),
            }
        })
        .collect()
}

/// Count, mean, extremes, and trend of total nets for one exam type.
///
/// Records of other types are ignored. The trend compares the two most
/// recent records by [`ExamRecord::recency_key`], so records sharing a date
/// are ordered by insertion time and then id.
pub fn stats(records: &[ExamRecord], exam_type: ExamType) -> StatSummary {
    let mut matching: Vec<&ExamRecord> = records
        .iter()
        .filter(|r| r.is_exam_type(exam_type))
        .collect();

    if matching.is_empty() {
        return StatSummary::default();
    }

    let nets: Vec<f64> = matching.iter().map(|r| total_net(r, exam_type)).collect();
    let count = nets.len();
    let avg_net = nets.iter().sum::<f64>() / count as f64;
    let max_net = nets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_net = nets.iter().copied().fold(f64::INFINITY, f64::min);

    let trend = if count >= 2 {
        matching.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
        total_net(matching[0], exam_type) - total_net(matching[1], exam_type)
    } else {
        0.0
    };

    StatSummary {
        count,
        avg_net,
        max_net,
        min_net,
        trend,
    }
}

/// Average success rate of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAverage {
    pub subject_id: String,
    pub name: String,
    pub avg_net: f64,
    pub avg_percentage: f64,
}

/// Mean net and percentage per subject across the records of one exam type,
/// in catalog order. Empty input yields zeros.
pub fn subject_averages(records: &[ExamRecord], exam_type: ExamType) -> Vec<SubjectAverage> {
    let matching: Vec<&ExamRecord> = records
        .iter()
        .filter(|r| r.is_exam_type(exam_type))
        .collect();
    let n = matching.len().max(1) as f64;
    let prefix = exam_type.prefix();

    exam_type
        .subjects()
        .iter()
        .map(|s| {
            let net_sum: f64 = matching.iter().map(|r| r.score(prefix, s.id).net()).sum();
            let avg_net = net_sum / n;
            SubjectAverage {
                subject_id: s.id.to_string(),
                name: s.name.to_string(),
                avg_net,
                avg_percentage: 100.0 * avg_net / f64::from(s.max_questions),
            }
        })
        .collect()
}
