//! netrack-core — Exam catalogs, net scoring, and analytics.
//!
//! This crate defines the record model, the subject catalogs, and the pure
//! aggregation functions that the rest of netrack builds on, plus the
//! repository trait and the change-driven dashboard.

pub mod catalog;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod model;
pub mod net;
pub mod parser;
pub mod report;
pub mod statistics;
pub mod traits;
pub mod validate;

pub use catalog::{prefix_for, subjects_for, ExamFamily, ExamType, Subject};
pub use chart::{chart_series, ChartBounds, ChartPoint};
pub use error::{CatalogError, ValidationError};
pub use model::{ExamRecord, ExamUpdate, SubjectScore};
pub use net::calculate_net;
pub use statistics::{stats, subject_nets, total_net, StatSummary, SubjectNet};
