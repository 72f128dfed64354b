//! Analytics report types with JSON persistence and progress comparison.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ExamType;
use crate::chart::{chart_series, ChartPoint};
use crate::model::ExamRecord;
use crate::statistics::{stats, subject_averages, StatSummary, SubjectAverage};

/// Everything computed for one exam type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamTypeSection {
    pub exam_type: ExamType,
    pub label: String,
    pub stats: StatSummary,
    pub subject_averages: Vec<SubjectAverage>,
    /// Oldest first.
    pub series: Vec<ChartPoint>,
}

impl ExamTypeSection {
    pub fn build(records: &[ExamRecord], exam_type: ExamType) -> Self {
        Self {
            exam_type,
            label: exam_type.label().to_string(),
            stats: stats(records, exam_type),
            subject_averages: subject_averages(records, exam_type),
            series: chart_series(records, exam_type),
        }
    }
}

/// One section per exam type that has at least one record, in catalog order.
pub fn summarize(records: &[ExamRecord]) -> Vec<ExamTypeSection> {
    ExamType::ALL
        .into_iter()
        .filter(|t| records.iter().any(|r| r.is_exam_type(*t)))
        .map(|t| ExamTypeSection::build(records, t))
        .collect()
}

/// A complete analytics report for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Owner of the records.
    pub user_id: String,
    /// Number of records considered, including unknown exam types.
    pub record_count: usize,
    /// Per-exam-type results.
    pub sections: Vec<ExamTypeSection>,
}

impl AnalyticsReport {
    pub fn build(user_id: &str, records: &[ExamRecord]) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_id: user_id.to_string(),
            record_count: records.len(),
            sections: summarize(records),
        }
    }

    pub fn section(&self, exam_type: ExamType) -> Option<&ExamTypeSection> {
        self.sections.iter().find(|s| s.exam_type == exam_type)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalyticsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare average nets against a baseline report.
    ///
    /// Changes within `threshold` nets count as unchanged.
    pub fn compare(&self, baseline: &AnalyticsReport, threshold: f64) -> ProgressReport {
        let averages = |report: &AnalyticsReport| -> HashMap<ExamType, f64> {
            report
                .sections
                .iter()
                .filter(|s| s.stats.count > 0)
                .map(|s| (s.exam_type, s.stats.avg_net))
                .collect()
        };

        let baseline_avgs = averages(baseline);
        let current_avgs = averages(self);

        let mut declines = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_types = Vec::new();

        for exam_type in ExamType::ALL {
            let Some(&current) = current_avgs.get(&exam_type) else {
                continue;
            };
            let Some(&previous) = baseline_avgs.get(&exam_type) else {
                new_types.push(exam_type);
                continue;
            };

            let change = NetChange {
                exam_type,
                baseline_avg: previous,
                current_avg: current,
                delta: current - previous,
            };
            if change.delta < -threshold {
                declines.push(change);
            } else if change.delta > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_types = ExamType::ALL
            .into_iter()
            .filter(|t| baseline_avgs.contains_key(t) && !current_avgs.contains_key(t))
            .collect();

        ProgressReport {
            declines,
            improvements,
            unchanged,
            new_types,
            removed_types,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Exam types whose average net went down.
    pub declines: Vec<NetChange>,
    /// Exam types whose average net went up.
    pub improvements: Vec<NetChange>,
    /// Exam types with no significant change.
    pub unchanged: usize,
    /// Exam types only in the current report.
    pub new_types: Vec<ExamType>,
    /// Exam types only in the baseline.
    pub removed_types: Vec<ExamType>,
}

/// Average-net movement of one exam type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetChange {
    pub exam_type: ExamType,
    pub baseline_avg: f64,
    pub current_avg: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} declines, {} improvements, {} unchanged\n\n",
            self.declines.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, changes) in [
            ("Declines", &self.declines),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Exam | Baseline | Current | Delta |\n");
            md.push_str("|------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:+.2} |\n",
                    c.exam_type.label(),
                    c.baseline_avg,
                    c.current_avg,
                    c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any exam type's average dropped.
    pub fn has_declines(&self) -> bool {
        !self.declines.is_empty()
    }
}
