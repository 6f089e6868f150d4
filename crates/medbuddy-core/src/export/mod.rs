//! Export functionality for adherence reports.

mod report;

pub use report::*;

use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
