//! The `netrack config` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut};

use netrack_core::catalog::ExamType;
use netrack_store::config::{dirs_path, load_config_from, LOCAL_CONFIG_FILE};
use netrack_store::NetrackConfig;

/// Keys `config set` accepts.
const SETTABLE_KEYS: &[&str] = &[
    "user_id",
    "default_exam_type",
    "output_dir",
    "store.type",
    "store.path",
    "store.url",
    "store.api_key",
    "store.table",
];

pub fn set(config_path: Option<&Path>, key: &str, raw: &str, global: bool) -> Result<()> {
    let path = target_path(config_path, global)?;

    let content = if path.exists() {
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?
    } else {
        String::new()
    };

    let updated = set_key(&content, key, raw)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, updated)
        .with_context(|| format!("failed to write config: {}", path.display()))?;

    println!("Set {key} in {}", path.display());
    Ok(())
}

pub fn show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config_from(config_path)?;
    println!("{config:#?}");
    Ok(())
}

fn target_path(config_path: Option<&Path>, global: bool) -> Result<PathBuf> {
    if let Some(p) = config_path {
        return Ok(p.to_path_buf());
    }
    if global {
        let dir = dirs_path().context("HOME is not set")?;
        return Ok(dir.join("config.toml"));
    }
    Ok(PathBuf::from(LOCAL_CONFIG_FILE))
}

/// Set `key` in a TOML document, keeping its comments and layout.
///
/// The result must still parse as a config.
fn set_key(content: &str, key: &str, raw: &str) -> Result<String> {
    if !SETTABLE_KEYS.contains(&key) {
        anyhow::bail!(
            "unknown config key '{key}' (expected one of: {})",
            SETTABLE_KEYS.join(", ")
        );
    }

    let normalized = if key == "default_exam_type" {
        raw.parse::<ExamType>()?.tag().to_string()
    } else {
        raw.to_string()
    };

    let mut doc: DocumentMut = content.parse().context("config is not valid TOML")?;
    match key.split_once('.') {
        Some((table, field)) => {
            if doc.get(table).is_some_and(|item| !item.is_table_like()) {
                anyhow::bail!("'{table}' is not a table");
            }
            doc[table][field] = value(normalized);
        }
        None => doc[key] = value(normalized),
    }

    let updated = doc.to_string();
    toml::from_str::<NetrackConfig>(&updated)
        .with_context(|| format!("setting {key} = {raw:?} would leave an invalid config"))?;
    Ok(updated)
}
