//! The `netrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

use netrack_core::parser::{load_records, validate_records};

pub fn execute(path: PathBuf) -> Result<()> {
    let records = load_records(&path)?;
    println!("{}: {} records", path.display(), records.len());

    let today = chrono::Local::now().date_naive();
    let warnings = validate_records(&records, today);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.record_id, w.message);
    }

    if warnings.is_empty() {
        println!("All records valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
