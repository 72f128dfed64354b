//! The `netrack list` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use netrack_core::catalog::{ExamFamily, ExamType};
use netrack_core::format::{format_net, long_date_label};
use netrack_core::statistics::total_net;

use super::Session;

pub async fn execute(
    config_path: Option<&Path>,
    exam_type: Option<ExamType>,
    family: Option<ExamFamily>,
) -> Result<()> {
    let session = Session::open(config_path)?;
    let records = session.store.list(session.user()).await?;

    let shown: Vec<_> = records
        .iter()
        .filter(|r| exam_type.map_or(true, |t| r.is_exam_type(t)))
        .filter(|r| family.map_or(true, |f| f.contains_tag(&r.exam_type)))
        .collect();

    if shown.is_empty() {
        println!("No exams recorded yet. Add one with `netrack add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Exam", "Net"]);
    for record in &shown {
        let (label, net) = match record.parse_exam_type() {
            Ok(t) => (t.label().to_string(), format_net(total_net(record, t))),
            Err(_) => (record.exam_type.clone(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(long_date_label(record.exam_date)),
            Cell::new(label),
            Cell::new(net),
        ]);
    }

    println!("{table}");
    println!("{} exam(s)", shown.len());
    Ok(())
}
