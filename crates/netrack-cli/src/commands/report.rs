//! The `netrack report` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use netrack_core::report::AnalyticsReport;
use netrack_report::write_html_report;

use super::Session;

pub async fn execute(
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let session = Session::open(config_path)?;
    let records = session.store.list(session.user()).await?;
    let report = AnalyticsReport::build(session.user(), &records);

    let output = output.unwrap_or_else(|| session.config.output_dir.clone());
    let stamp = report.created_at.format("%Y%m%d-%H%M%S");

    let formats: &[&str] = match format {
        "all" => &["json", "html"],
        "json" => &["json"],
        "html" => &["html"],
        other => anyhow::bail!("unknown format: {other} (expected json, html or all)"),
    };

    for fmt in formats {
        let path = output.join(format!("netrack-{stamp}.{fmt}"));
        if *fmt == "json" {
            report.save_json(&path)?;
        } else {
            write_html_report(&report, &records, &path)?;
        }
        println!("Wrote {}", path.display());
    }

    tracing::info!(
        records = report.record_count,
        sections = report.sections.len(),
        "report written"
    );
    Ok(())
}
