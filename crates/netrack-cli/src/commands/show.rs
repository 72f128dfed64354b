//! The `netrack show` command.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use netrack_core::format::{format_net, long_date_label};
use netrack_core::statistics::{subject_nets, total_net};

use super::Session;

pub async fn execute(config_path: Option<&Path>, id: &str) -> Result<()> {
    let session = Session::open(config_path)?;
    let records = session.store.list(session.user()).await?;
    let record = records
        .iter()
        .find(|r| r.id == id)
        .with_context(|| format!("exam record not found: {id}"))?;
    let exam_type = record.parse_exam_type()?;

    println!(
        "{} | {} | total net {}",
        exam_type.label(),
        long_date_label(record.exam_date),
        format_net(total_net(record, exam_type))
    );

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Correct", "Wrong", "Blank", "Net", "Success"]);
    for s in subject_nets(record, exam_type) {
        table.add_row(vec![
            Cell::new(format!("{} ({})", s.name, s.max_questions)),
            Cell::new(s.correct),
            Cell::new(s.wrong),
            Cell::new(s.blank),
            Cell::new(format_net(s.net)),
            Cell::new(format!("{:.1}%", s.percentage)),
        ]);
    }
    println!("{table}");

    Ok(())
}
