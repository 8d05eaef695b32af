//! SQLite-backed content table.
//!
//! # Invariants
//! - Reads are public; writes need a live admin session.
//! - A missing table surfaces as `BackendError::MissingTable`, never as a
//!   generic database error.

use super::{BackendError, BackendResult, ContentBackend};
use crate::auth::{AdminAuth, Session};
use crate::db::DbError;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde_json::Value;
use std::sync::Arc;

/// Table holding the aggregate document.
pub const CONTENT_TABLE: &str = "portfolio_config";

pub struct SqliteContentBackend<'conn> {
    conn: &'conn Connection,
    auth: Arc<AdminAuth>,
    session: Option<Session>,
}

impl<'conn> SqliteContentBackend<'conn> {
    pub fn new(conn: &'conn Connection, auth: Arc<AdminAuth>) -> Self {
        Self {
            conn,
            auth,
            session: None,
        }
    }

    /// Attaches the session used for subsequent writes.
    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn require_session(&self) -> BackendResult<()> {
        if self.auth.is_authenticated(self.session.as_ref()) {
            Ok(())
        } else {
            Err(BackendError::PermissionDenied)
        }
    }
}

impl ContentBackend for SqliteContentBackend<'_> {
    fn fetch(&self, row_id: &str) -> BackendResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT content FROM portfolio_config WHERE id = ?1;",
                [row_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sqlite_error)?;

        let Some(text) = raw else {
            return Ok(None);
        };
        // A `null` document counts as no row.
        match serde_json::from_str(&text) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(err) => Err(BackendError::InvalidData(err.to_string())),
        }
    }

    fn insert(&self, row_id: &str, content: &Value) -> BackendResult<()> {
        self.require_session()?;
        self.conn
            .execute(
                "INSERT INTO portfolio_config (id, content) VALUES (?1, ?2);",
                params![row_id, content.to_string()],
            )
            .map_err(|err| match err.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => BackendError::Conflict(row_id.to_string()),
                _ => map_sqlite_error(err),
            })?;
        Ok(())
    }

    fn upsert(&self, row_id: &str, content: &Value) -> BackendResult<()> {
        self.require_session()?;
        self.conn
            .execute(
                "INSERT INTO portfolio_config (id, content) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                    content = excluded.content,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![row_id, content.to_string()],
            )
            .map_err(map_sqlite_error)?;
        Ok(())
    }
}

fn map_sqlite_error(err: rusqlite::Error) -> BackendError {
    let message = match &err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => Some(message.as_str()),
        rusqlite::Error::SqlInputError { msg, .. } => Some(msg.as_str()),
        _ => None,
    };
    if let Some(table) = message.and_then(|m| m.strip_prefix("no such table: ")) {
        return BackendError::MissingTable(table.trim().to_string());
    }
    BackendError::Db(DbError::Sqlite(err))
}

#[cfg(test)]
mod tests {
    use super::map_sqlite_error;
    use crate::backend::BackendError;
    use rusqlite::ffi;

    fn failure(message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_ERROR), Some(message.to_string()))
    }

    #[test]
    fn missing_table_is_named_from_the_error() {
        match map_sqlite_error(failure("no such table: storage_objects")) {
            BackendError::MissingTable(table) => assert_eq!(table, "storage_objects"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn other_failures_mentioning_tables_stay_database_errors() {
        let err = map_sqlite_error(failure("no such column: content (no such table hint)"));
        assert!(matches!(err, BackendError::Db(_)));
    }
}
