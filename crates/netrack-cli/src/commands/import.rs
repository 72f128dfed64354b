//! The `netrack import` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use netrack_core::parser::load_records;

use super::Session;

pub async fn execute(config_path: Option<&Path>, path: PathBuf) -> Result<()> {
    let session = Session::open(config_path)?;
    let records = load_records(&path)?;

    let mut imported = 0usize;
    let mut skipped = 0usize;
    for record in records {
        let id = record.id.clone();
        match session.store.insert(session.user(), record).await {
            Ok(_) => imported += 1,
            Err(e) => {
                skipped += 1;
                println!("  [{id}] skipped: {e:#}");
            }
        }
    }

    println!("Imported {imported} exam(s), skipped {skipped}.");
    if imported == 0 && skipped > 0 {
        anyhow::bail!("no records imported from {}", path.display());
    }
    Ok(())
}
