//! Object storage for uploaded images and PDFs.
//!
//! # Responsibility
//! - Validate upload type and size.
//! - Generate collision-free object names and return public URLs.
//!
//! # Invariants
//! - Only `image/*` and `application/pdf` are accepted.
//! - Objects are never overwritten.
//! - Writes need a live admin session.

use crate::auth::{AdminAuth, Session};
use crate::db::DbError;
use chrono::Utc;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Default bucket for site media.
pub const DEFAULT_BUCKET: &str = "portfolio-images";
/// Size cap applied to single photo uploads.
pub const PHOTO_UPLOAD_LIMIT_BYTES: usize = 5 * 1024 * 1024;

const CACHE_CONTROL_SECONDS: u32 = 3600;
const MAX_NAME_STEM_CHARS: usize = 20;

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid name sanitizer regex"));

#[derive(Debug)]
pub enum UploadError {
    UnsupportedType(String),
    TooLarge { size: usize, limit: usize },
    Empty,
    PermissionDenied,
    /// An object with the generated name already exists.
    AlreadyExists(String),
    Db(DbError),
}

impl UploadError {
    /// Short message fit for inline display next to an upload control.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedType(_) => "Only image or PDF files are allowed.".to_string(),
            Self::TooLarge { limit, .. } => format!("Max {} MB.", limit / (1024 * 1024)),
            Self::Empty => "The file is empty.".to_string(),
            Self::PermissionDenied => "Session expired. Please sign in again.".to_string(),
            Self::AlreadyExists(_) | Self::Db(_) => "Upload failed.".to_string(),
        }
    }
}

impl Display for UploadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType(kind) => write!(f, "unsupported content type `{kind}`"),
            Self::TooLarge { size, limit } => {
                write!(f, "file of {size} bytes exceeds the {limit} byte limit")
            }
            Self::Empty => write!(f, "file is empty"),
            Self::PermissionDenied => write!(f, "permission denied: admin session required"),
            Self::AlreadyExists(name) => write!(f, "object `{name}` already exists"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UploadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for UploadError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Stored object as returned by reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    pub content_type: String,
    pub cache_control: String,
    pub bytes: Vec<u8>,
}

/// Bucket contract.
pub trait ObjectStore {
    /// Stores a new object and returns its public URL.
    fn put(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String, UploadError>;
    /// Public URL for `name`, whether or not it exists.
    fn public_url(&self, name: &str) -> String;
}

/// Bucket persisted in the `storage_objects` table.
pub struct SqliteObjectStore<'conn> {
    conn: &'conn Connection,
    bucket: String,
    public_base_url: String,
    auth: Arc<AdminAuth>,
    session: Option<Session>,
}

impl<'conn> SqliteObjectStore<'conn> {
    pub fn new(
        conn: &'conn Connection,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
        auth: Arc<AdminAuth>,
    ) -> Self {
        Self {
            conn,
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            auth,
            session: None,
        }
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    /// Reads an object back; `None` when absent.
    pub fn get(&self, name: &str) -> Result<Option<StoredObject>, UploadError> {
        let object = self
            .conn
            .query_row(
                "SELECT name, content_type, cache_control, bytes
                 FROM storage_objects
                 WHERE bucket = ?1 AND name = ?2;",
                params![self.bucket, name],
                |row| {
                    Ok(StoredObject {
                        name: row.get(0)?,
                        content_type: row.get(1)?,
                        cache_control: row.get(2)?,
                        bytes: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(object)
    }
}

impl ObjectStore for SqliteObjectStore<'_> {
    fn put(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if !self.auth.is_authenticated(self.session.as_ref()) {
            return Err(UploadError::PermissionDenied);
        }

        self.conn
            .execute(
                "INSERT INTO storage_objects (bucket, name, content_type, cache_control, bytes)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    self.bucket,
                    name,
                    content_type,
                    format!("max-age={CACHE_CONTROL_SECONDS}"),
                    bytes
                ],
            )
            .map_err(|err| match err.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => UploadError::AlreadyExists(name.to_string()),
                _ => UploadError::from(err),
            })?;

        Ok(self.public_url(name))
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, name)
    }
}

/// Validates and stores one file, returning its public URL.
///
/// `limit` caps the payload size when set.
pub fn upload_file(
    store: &dyn ObjectStore,
    original_name: &str,
    content_type: &str,
    bytes: &[u8],
    limit: Option<usize>,
) -> Result<String, UploadError> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if !is_supported_content_type(&content_type) {
        return Err(UploadError::UnsupportedType(content_type));
    }
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if let Some(limit) = limit.filter(|limit| bytes.len() > *limit) {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            limit,
        });
    }

    let name = generate_object_name(original_name, Utc::now().timestamp_millis());
    match store.put(&name, &content_type, bytes) {
        Ok(url) => {
            info!(
                "event=upload module=storage status=ok content_type={} size={}",
                content_type,
                bytes.len()
            );
            Ok(url)
        }
        Err(err) => {
            error!(
                "event=upload module=storage status=error content_type={} error={}",
                content_type, err
            );
            Err(err)
        }
    }
}

/// Whether uploads of `content_type` are accepted.
pub fn is_supported_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type == "application/pdf"
}

/// Builds `{millis}-{stem}.{ext}` from a user-supplied file name.
///
/// The stem keeps ASCII alphanumerics, maps everything else to `_`, and is
/// cut to 20 characters. The extension is the text after the last dot.
pub fn generate_object_name(original_name: &str, millis: i64) -> String {
    let sanitized = NON_ALNUM_RE.replace_all(original_name, "_");
    let stem = sanitized.chars().take(MAX_NAME_STEM_CHARS).collect::<String>();
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| NON_ALNUM_RE.replace_all(ext, "").to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string());
    format!("{millis}-{stem}.{extension}")
}
