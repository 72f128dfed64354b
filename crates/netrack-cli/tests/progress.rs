//! Progress comparison integration tests.
//!
//! Saves analytics reports to disk, reloads them, and checks that average
//! net movements are classified correctly.

use chrono::{Duration, NaiveDate};
use netrack_core::catalog::ExamType;
use netrack_core::model::{ExamRecord, SubjectScore};
use netrack_core::report::AnalyticsReport;

/// `n` weekly TYT exams whose total nets start at `first` and step by `step`.
fn tyt_series(n: usize, first: u32, step: i32) -> Vec<ExamRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    (0..n)
        .map(|i| {
            let correct = (first as i32 + step * i as i32).clamp(0, 40) as u32;
            ExamRecord::new(ExamType::Tyt, start + Duration::weeks(i as i64))
                .with_id(format!("tyt-{i}"))
                .with_score("matematik", SubjectScore::new(correct, 0, 0))
        })
        .collect()
}

fn ayt_exam(day: &str, matematik: u32, fizik: u32) -> ExamRecord {
    ExamRecord::new(ExamType::AytSayisal, day.parse().unwrap())
        .with_score("matematik", SubjectScore::new(matematik, 0, 0))
        .with_score("fizik", SubjectScore::new(fizik, 4, 0))
}

fn round_trip(report: &AnalyticsReport) -> AnalyticsReport {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    AnalyticsReport::load_json(&path).unwrap()
}

#[test]
fn improvement_survives_json_round_trip() {
    let baseline = round_trip(&AnalyticsReport::build("u1", &tyt_series(4, 20, 0)));
    let current = round_trip(&AnalyticsReport::build("u1", &tyt_series(4, 24, 2)));

    let progress = current.compare(&baseline, 0.5);
    assert!(!progress.has_declines());
    assert_eq!(progress.improvements.len(), 1);

    let change = &progress.improvements[0];
    assert_eq!(change.exam_type, ExamType::Tyt);
    assert_eq!(change.baseline_avg, 20.0);
    assert_eq!(change.current_avg, 27.0);
    assert_eq!(change.delta, 7.0);
}

#[test]
fn mixed_movements_across_exam_types() {
    let mut before = tyt_series(3, 30, 0);
    before.push(ayt_exam("2024-01-10", 20, 8));
    before.push(ayt_exam("2024-01-17", 22, 8));

    let mut after = tyt_series(3, 26, 0);
    after.push(ayt_exam("2024-02-10", 21, 8));
    after.push(ayt_exam("2024-02-17", 21, 8));
    after.push(
        ExamRecord::new(ExamType::AytEsit, "2024-02-20".parse().unwrap())
            .with_score("edebiyat", SubjectScore::new(15, 4, 5)),
    );

    let baseline = AnalyticsReport::build("u1", &before);
    let current = AnalyticsReport::build("u1", &after);
    let progress = current.compare(&baseline, 0.5);

    assert_eq!(progress.declines.len(), 1);
    assert_eq!(progress.declines[0].exam_type, ExamType::Tyt);
    assert_eq!(progress.declines[0].delta, -4.0);
    // AYT Sayısal averages 28 before and after.
    assert_eq!(progress.unchanged, 1);
    assert_eq!(progress.new_types, vec![ExamType::AytEsit]);
    assert!(progress.removed_types.is_empty());

    let md = progress.to_markdown();
    assert!(md.contains("1 declines, 0 improvements, 1 unchanged"));
    assert!(md.contains("| TYT | 30.00 | 26.00 | -4.00 |"));
}

#[test]
fn threshold_controls_sensitivity() {
    let baseline = AnalyticsReport::build("u1", &tyt_series(2, 30, 0));
    let current = AnalyticsReport::build("u1", &tyt_series(2, 29, 0));

    assert!(current.compare(&baseline, 0.5).has_declines());
    assert!(!current.compare(&baseline, 1.0).has_declines());
    assert_eq!(current.compare(&baseline, 1.0).unchanged, 1);
}

#[test]
fn report_keeps_unknown_types_in_count_only() {
    let mut records = tyt_series(2, 30, 0);
    let mut legacy = ExamRecord::new(ExamType::Tyt, "2023-06-01".parse().unwrap());
    legacy.exam_type = "LGS".into();
    records.push(legacy);

    let report = round_trip(&AnalyticsReport::build("u1", &records));
    assert_eq!(report.record_count, 3);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.section(ExamType::Tyt).unwrap().stats.count, 2);
}
