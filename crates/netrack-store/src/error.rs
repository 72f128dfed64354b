//! Store error types.

use netrack_core::ValidationError;
use thiserror::Error;

/// Errors that can occur when reading or mutating exam records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record was rejected before it reached the backend.
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),

    /// No record with this id belongs to the user.
    #[error("exam record not found: {0}")]
    NotFound(String),

    /// A record with this id already exists.
    #[error("exam record already exists: {0}")]
    Duplicate(String),

    /// The backend rejected the credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend returned an error response.
    #[error("backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}
