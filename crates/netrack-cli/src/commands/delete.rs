//! The `netrack delete` command.

use std::path::Path;

use anyhow::Result;

use super::Session;

pub async fn execute(config_path: Option<&Path>, id: &str) -> Result<()> {
    let session = Session::open(config_path)?;
    session.store.delete(session.user(), id).await?;
    println!("Deleted exam {id}");
    Ok(())
}
