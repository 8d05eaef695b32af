//! Remote document persistence.
//!
//! # Responsibility
//! - Define the contract of the database that holds the aggregate document.
//! - Report failures with enough meaning for the store to pick a fallback.
//!
//! # Invariants
//! - Documents are read and written whole; there are no partial updates.
//! - `upsert` is last-write-wins.

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::{SqliteContentBackend, CONTENT_TABLE};

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug)]
pub enum BackendError {
    /// The content table does not exist.
    MissingTable(String),
    /// The caller has no live admin session.
    PermissionDenied,
    /// `insert` found an existing row.
    Conflict(String),
    /// A stored row could not be decoded as JSON.
    InvalidData(String),
    /// The backend could not be reached.
    Unavailable(String),
    Db(DbError),
}

impl BackendError {
    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTable(_) => "missing_table",
            Self::PermissionDenied => "permission_denied",
            Self::Conflict(_) => "conflict",
            Self::InvalidData(_) => "invalid_data",
            Self::Unavailable(_) => "unavailable",
            Self::Db(_) => "db_error",
        }
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable(table) => write!(f, "table `{table}` does not exist"),
            Self::PermissionDenied => write!(f, "permission denied: admin session required"),
            Self::Conflict(row_id) => write!(f, "row `{row_id}` already exists"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::Unavailable(message) => write!(f, "backend unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Storage contract for the single-row content table.
pub trait ContentBackend {
    /// Reads the document stored under `row_id`, if any.
    fn fetch(&self, row_id: &str) -> BackendResult<Option<Value>>;
    /// Creates the row; fails with `Conflict` when it exists.
    fn insert(&self, row_id: &str, content: &Value) -> BackendResult<()>;
    /// Creates or replaces the row.
    fn upsert(&self, row_id: &str, content: &Value) -> BackendResult<()>;
}
