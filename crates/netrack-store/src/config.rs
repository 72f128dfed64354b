//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use netrack_core::catalog::ExamType;
use netrack_core::traits::{ExamRepository, EXAMS_TABLE};

use crate::file::JsonFileStore;
use crate::memory::MemoryStore;
use crate::rest::RestStore;

/// File name searched for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "netrack.toml";

/// Where exam records are kept.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    File {
        #[serde(default = "default_data_file")]
        path: PathBuf,
    },
    Memory,
    Rest {
        url: String,
        #[serde(default)]
        api_key: String,
        #[serde(default = "default_table")]
        table: String,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::File { path } => f.debug_struct("File").field("path", path).finish(),
            StoreConfig::Memory => f.write_str("Memory"),
            StoreConfig::Rest {
                url,
                api_key: _,
                table,
            } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("api_key", &"***")
                .field("table", table)
                .finish(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_data_file(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("netrack-exams.json")
}
fn default_table() -> String {
    EXAMS_TABLE.to_string()
}

/// Top-level netrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetrackConfig {
    /// Whose records the CLI reads and writes.
    #[serde(default = "default_user")]
    pub user_id: String,
    /// Exam type used when a command does not name one.
    #[serde(default = "default_exam_type")]
    pub default_exam_type: ExamType,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_user() -> String {
    "local".to_string()
}
fn default_exam_type() -> ExamType {
    ExamType::Tyt
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./netrack-reports")
}

impl Default for NetrackConfig {
    fn default() -> Self {
        Self {
            user_id: default_user(),
            default_exam_type: default_exam_type(),
            output_dir: default_output_dir(),
            store: StoreConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::File { path } => StoreConfig::File {
            path: resolve_path(path),
        },
        StoreConfig::Memory => StoreConfig::Memory,
        StoreConfig::Rest {
            url,
            api_key,
            table,
        } => StoreConfig::Rest {
            url: resolve_env_vars(url),
            api_key: resolve_env_vars(api_key),
            table: resolve_env_vars(table),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `netrack.toml` in the current directory
/// 2. `~/.config/netrack/config.toml`
///
/// Environment variable overrides: `NETRACK_USER`, `NETRACK_DATA_FILE`,
/// `NETRACK_API_KEY`.
pub fn load_config() -> Result<NetrackConfig> {
    load_config_from(None)
}

/// The config file that [`load_config`] would read, if any.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let global = dirs_path()?.join("config.toml");
    global.exists().then_some(global)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<NetrackConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => find_config_file(),
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<NetrackConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => NetrackConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    config.user_id = resolve_env_vars(&config.user_id);
    config.output_dir = resolve_path(&config.output_dir);
    config.store = resolve_store_config(&config.store);

    Ok(config)
}

fn apply_env_overrides(config: &mut NetrackConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(user) = var("NETRACK_USER") {
        config.user_id = user;
    }

    if let Some(path) = var("NETRACK_DATA_FILE") {
        config.store = StoreConfig::File {
            path: PathBuf::from(path),
        };
    }

    if let Some(key) = var("NETRACK_API_KEY") {
        if let StoreConfig::Rest { api_key, .. } = &mut config.store {
            *api_key = key;
        }
    }
}

/// `~/.config/netrack`
pub fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("netrack"))
}

/// Create a repository from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ExamRepository>> {
    match config {
        StoreConfig::File { path } => Ok(Arc::new(JsonFileStore::new(path))),
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::Rest {
            url,
            api_key,
            table,
        } => {
            if api_key.is_empty() {
                anyhow::bail!("REST store needs an api_key (or set NETRACK_API_KEY)");
            }
            let store = RestStore::new(url, api_key, table)
                .with_context(|| format!("failed to set up REST store for {url}"))?;
            Ok(Arc::new(store))
        }
    }
}
