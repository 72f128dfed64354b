//! Time-ordered series for line-chart renderers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::ExamType;
use crate::format::short_date_label;
use crate::model::ExamRecord;
use crate::statistics::{subject_nets, total_net, SubjectNet};

/// One point of the net-over-time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Short axis label derived from `full_date`.
    pub date: String,
    pub full_date: NaiveDate,
    pub total_net: f64,
    pub subject_nets: Vec<SubjectNet>,
}

/// Records of `exam_type`, oldest first.
///
/// The sort is stable: records sharing a date keep their input order.
pub fn chart_series(records: &[ExamRecord], exam_type: ExamType) -> Vec<ChartPoint> {
    let mut matching: Vec<&ExamRecord> = records
        .iter()
        .filter(|r| r.is_exam_type(exam_type))
        .collect();
    matching.sort_by_key(|r| r.exam_date);

    matching
        .into_iter()
        .map(|r| ChartPoint {
            date: short_date_label(r.exam_date),
            full_date: r.exam_date,
            total_net: total_net(r, exam_type),
            subject_nets: subject_nets(r, exam_type),
        })
        .collect()
}

/// Vertical axis range for a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartBounds {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl ChartBounds {
    /// The axis always spans at least `[0, 1]`.
    pub fn of(series: &[ChartPoint]) -> Self {
        let max = series.iter().map(|p| p.total_net).fold(1.0, f64::max);
        let min = series.iter().map(|p| p.total_net).fold(0.0, f64::min);
        let range = if max - min == 0.0 { 1.0 } else { max - min };
        Self { min, max, range }
    }

    /// Position of `value` within the range, 0.0 at `min` and 1.0 at `max`.
    pub fn ratio(&self, value: f64) -> f64 {
        (value - self.min) / self.range
    }
}
