//! The `netrack chart` command.

use std::path::Path;

use anyhow::Result;

use netrack_core::catalog::ExamType;
use netrack_core::chart::{chart_series, ChartBounds};
use netrack_core::format::format_net;

use super::Session;

const BAR_WIDTH: f64 = 40.0;

pub async fn execute(
    config_path: Option<&Path>,
    exam_type: Option<ExamType>,
    format: &str,
) -> Result<()> {
    let session = Session::open(config_path)?;
    let exam_type = exam_type.unwrap_or(session.config.default_exam_type);
    let records = session.store.list(session.user()).await?;
    let series = chart_series(&records, exam_type);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&series)?),
        "text" => {
            if series.is_empty() {
                println!("No {} exams recorded yet.", exam_type.label());
                return Ok(());
            }
            let bounds = ChartBounds::of(&series);
            println!(
                "{} net over time (axis {} to {})",
                exam_type.label(),
                format_net(bounds.min),
                format_net(bounds.max)
            );
            for point in &series {
                let width = (bounds.ratio(point.total_net) * BAR_WIDTH).round() as usize;
                println!(
                    "  {}  {:<40}  {}",
                    point.date,
                    "#".repeat(width),
                    format_net(point.total_net)
                );
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
