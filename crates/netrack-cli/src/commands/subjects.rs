//! The `netrack subjects` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use netrack_core::catalog::ExamType;

pub fn execute(exam_type: Option<ExamType>) -> Result<()> {
    let types = match exam_type {
        Some(t) => vec![t],
        None => ExamType::ALL.to_vec(),
    };

    for exam_type in types {
        let mut table = Table::new();
        table.set_header(vec!["Subject", "Name", "Questions", "Fields"]);
        for subject in exam_type.subjects() {
            table.add_row(vec![
                Cell::new(subject.id),
                Cell::new(subject.name),
                Cell::new(subject.max_questions),
                Cell::new(format!("{}{}_dogru/_yanlis/_bos", exam_type.prefix(), subject.id)),
            ]);
        }

        println!(
            "{} ({}), max net {}",
            exam_type.label(),
            exam_type.tag(),
            exam_type.max_total_net()
        );
        println!("{table}\n");
    }

    Ok(())
}
