//! Catalog and validation error types.
//!
//! `CatalogError` is the only failure the pure analytics functions can
//! produce. `ValidationError` is raised at write time by repositories.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from subject catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The tag does not name any configured catalog.
    #[error("unknown exam type: {0}")]
    UnknownExamType(String),
}

/// Reasons a record is rejected before it is stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The record's exam type has no catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Correct + wrong + blank exceeds the subject's question count.
    #[error("{subject}: correct + wrong + blank = {total} exceeds {max} questions")]
    SubjectOverflow {
        subject: String,
        total: u64,
        max: u32,
    },

    /// The exam date lies after the reference day.
    #[error("exam date {date} is in the future")]
    FutureDate { date: NaiveDate },

    /// A score column holds a negative or non-integer value.
    #[error("invalid count in `{key}`: {value}")]
    InvalidCount { key: String, value: String },
}

impl ValidationError {
    /// The subject id this error refers to, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            ValidationError::SubjectOverflow { subject, .. } => Some(subject),
            _ => None,
        }
    }
}
