//! The `netrack compare` command.

use std::path::PathBuf;

use anyhow::Result;

use netrack_core::report::AnalyticsReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let baseline = AnalyticsReport::load_json(&baseline_path)?;
    let current = AnalyticsReport::load_json(&current_path)?;

    let progress = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            println!(
                "Comparison: {} declines, {} improvements, {} unchanged",
                progress.declines.len(),
                progress.improvements.len(),
                progress.unchanged
            );

            for (title, changes) in [
                ("Declines", &progress.declines),
                ("Improvements", &progress.improvements),
            ] {
                if changes.is_empty() {
                    continue;
                }
                println!("\n{title}:");
                for c in changes {
                    println!(
                        "  {} {:.2} -> {:.2} ({:+.2})",
                        c.exam_type.label(),
                        c.baseline_avg,
                        c.current_avg,
                        c.delta
                    );
                }
            }

            if !progress.new_types.is_empty() {
                let tags: Vec<_> = progress.new_types.iter().map(|t| t.tag()).collect();
                println!("\nNew exam types: {}", tags.join(", "));
            }
            if !progress.removed_types.is_empty() {
                let tags: Vec<_> = progress.removed_types.iter().map(|t| t.tag()).collect();
                println!("Removed exam types: {}", tags.join(", "));
            }
        }
    }

    if fail_on_decline && progress.has_declines() {
        std::process::exit(1);
    }

    Ok(())
}
