//! netrack-store — Exam record repositories.
//!
//! Implements the `ExamRepository` trait for a local JSON file, an
//! in-process store, and a PostgREST (Supabase) endpoint, plus the config
//! layer that picks one.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod rest;
mod table;

pub use config::{create_store, load_config, NetrackConfig, StoreConfig};
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use rest::RestStore;

/// Buffered change events per subscriber before it lags.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;
