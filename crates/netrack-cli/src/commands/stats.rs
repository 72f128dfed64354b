//! The `netrack stats` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use netrack_core::catalog::ExamType;
use netrack_core::dashboard::Dashboard;
use netrack_core::format::{format_net, format_trend};

use super::Session;

pub async fn execute(config_path: Option<&Path>, exam_type: Option<ExamType>) -> Result<()> {
    let session = Session::open(config_path)?;
    let exam_type = exam_type.unwrap_or(session.config.default_exam_type);

    let dashboard = Dashboard::load(session.store.clone(), session.user()).await?;
    let snapshot = dashboard.snapshot();
    let Some(section) = snapshot.section(exam_type) else {
        println!("No {} exams recorded yet.", exam_type.label());
        return Ok(());
    };

    let s = &section.stats;
    println!("{} ({} exams)", section.label, s.count);
    println!("  Average: {}", format_net(s.avg_net));
    println!("  Best:    {}", format_net(s.max_net));
    println!("  Lowest:  {}", format_net(s.min_net));
    println!("  Trend:   {}", format_trend(s.trend));

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Average net", "Success"]);
    for avg in &section.subject_averages {
        table.add_row(vec![
            Cell::new(&avg.name),
            Cell::new(format_net(avg.avg_net)),
            Cell::new(format!("{:.1}%", avg.avg_percentage)),
        ]);
    }
    println!("\n{table}");

    Ok(())
}
