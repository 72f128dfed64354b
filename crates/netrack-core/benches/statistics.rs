use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::{Duration, NaiveDate};
use netrack_core::catalog::ExamType;
use netrack_core::chart::chart_series;
use netrack_core::model::{ExamRecord, SubjectScore};
use netrack_core::report::summarize;
use netrack_core::statistics::{stats, total_net};

fn make_records(n: usize) -> Vec<ExamRecord> {
    let start = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
    (0..n)
        .map(|i| {
            let exam_type = if i % 3 == 0 {
                ExamType::AytSayisal
            } else {
                ExamType::Tyt
            };
            let mut record = ExamRecord::new(exam_type, start + Duration::days((i % 300) as i64))
                .with_id(format!("r{i}"));
            for subject in exam_type.subjects() {
                let correct = (i as u32 * 7) % subject.max_questions;
                let wrong = (subject.max_questions - correct) / 2;
                record = record.with_score(subject.id, SubjectScore::new(correct, wrong, 0));
            }
            record
        })
        .collect()
}

fn bench_total_net(c: &mut Criterion) {
    let records = make_records(1);
    c.bench_function("total_net/ayt_sayisal", |b| {
        b.iter(|| total_net(black_box(&records[0]), black_box(ExamType::AytSayisal)))
    });
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for n in [10, 100, 1000] {
        let records = make_records(n);
        group.bench_function(format!("{n}_records"), |b| {
            b.iter(|| stats(black_box(&records), black_box(ExamType::Tyt)))
        });
    }

    group.finish();
}

fn bench_chart_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_series");

    for n in [10, 100, 1000] {
        let records = make_records(n);
        group.bench_function(format!("{n}_records"), |b| {
            b.iter(|| chart_series(black_box(&records), black_box(ExamType::Tyt)))
        });
    }

    let records = make_records(1000);
    group.bench_function("summarize_1000", |b| {
        b.iter(|| summarize(black_box(&records)))
    });

    group.finish();
}

criterion_group!(benches, bench_total_net, bench_stats, bench_chart_series);
criterion_main!(benches);
