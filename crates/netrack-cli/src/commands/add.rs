//! The `netrack add` command.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use netrack_core::catalog::ExamType;
use netrack_core::format::{format_net, long_date_label};
use netrack_core::model::{ExamRecord, SubjectScore};
use netrack_core::statistics::total_net;

use super::Session;

pub async fn execute(
    config_path: Option<&Path>,
    exam_type: Option<ExamType>,
    date: Option<NaiveDate>,
    scores: Vec<String>,
    id: Option<String>,
) -> Result<()> {
    let session = Session::open(config_path)?;
    let exam_type = exam_type.unwrap_or(session.config.default_exam_type);
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut record = ExamRecord::new(exam_type, date);
    if let Some(id) = id {
        record = record.with_id(id);
    }
    for arg in &scores {
        let (subject_id, score) = parse_score(exam_type, arg)?;
        record.set_score(exam_type.prefix(), subject_id, score);
    }

    let stored = session.store.insert(session.user(), record).await?;
    println!(
        "Added {} exam {} ({}): net {}",
        exam_type.label(),
        stored.id,
        long_date_label(stored.exam_date),
        format_net(total_net(&stored, exam_type))
    );

    Ok(())
}

/// Parse `subject=correct/wrong[/blank]`.
///
/// A missing blank count is whatever the subject's question count leaves.
fn parse_score(exam_type: ExamType, arg: &str) -> Result<(&'static str, SubjectScore)> {
    let (subject_id, counts) = arg
        .split_once('=')
        .with_context(|| format!("expected subject=correct/wrong[/blank], got '{arg}'"))?;

    let subject = exam_type.subject(subject_id.trim()).with_context(|| {
        let known: Vec<_> = exam_type.subjects().iter().map(|s| s.id).collect();
        format!(
            "unknown subject '{}' for {} (expected one of: {})",
            subject_id.trim(),
            exam_type.tag(),
            known.join(", ")
        )
    })?;

    let numbers = counts
        .split('/')
        .map(|n| {
            n.trim()
                .parse::<u32>()
                .with_context(|| format!("invalid count '{n}' in '{arg}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let score = match numbers.as_slice() {
        [correct, wrong] => SubjectScore::new(
            *correct,
            *wrong,
            subject.max_questions.saturating_sub(correct.saturating_add(*wrong)),
        ),
        [correct, wrong, blank] => SubjectScore::new(*correct, *wrong, *blank),
        _ => anyhow::bail!("expected subject=correct/wrong[/blank], got '{arg}'"),
    };

    Ok((subject.id, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_derived_when_omitted() {
        let (id, score) = parse_score(ExamType::Tyt, "matematik=30/8").unwrap();
        assert_eq!(id, "matematik");
        assert_eq!(score, SubjectScore::new(30, 8, 2));

        let (_, score) = parse_score(ExamType::Tyt, "fen=18/5").unwrap();
        assert_eq!(score.blank, 0);
    }

    #[test]
    fn explicit_blank() {
        let (_, score) = parse_score(ExamType::AytSayisal, "fizik = 7/3/4").unwrap();
        assert_eq!(score, SubjectScore::new(7, 3, 4));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_score(ExamType::Tyt, "matematik").is_err());
        assert!(parse_score(ExamType::Tyt, "matematik=30").is_err());
        assert!(parse_score(ExamType::Tyt, "matematik=a/b").is_err());
        assert!(parse_score(ExamType::Tyt, "matematik=-1/2").is_err());

        let err = parse_score(ExamType::AytSozel, "fizik=5/1").unwrap_err();
        assert!(err.to_string().contains("unknown subject 'fizik'"));
    }
}
