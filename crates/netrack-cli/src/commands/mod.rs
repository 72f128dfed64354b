pub mod add;
pub mod chart;
pub mod compare;
pub mod config;
pub mod delete;
pub mod import;
pub mod init;
pub mod list;
pub mod report;
pub mod show;
pub mod stats;
pub mod subjects;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use netrack_core::traits::ExamRepository;
use netrack_store::{create_store, NetrackConfig};

/// Loaded configuration plus the repository it points at.
pub struct Session {
    pub config: NetrackConfig,
    pub store: Arc<dyn ExamRepository>,
}

impl Session {
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = netrack_store::config::load_config_from(config_path)?;
        let store = create_store(&config.store)?;
        tracing::debug!(backend = store.name(), user = %config.user_id, "store ready");
        Ok(Self { config, store })
    }

    pub fn user(&self) -> &str {
        &self.config.user_id
    }
}
