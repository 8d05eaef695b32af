//! Runtime configuration.
//!
//! # Responsibility
//! - Load `folio.toml`, fill every missing key with a default, and apply
//!   `FOLIO_*` environment overrides.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - Environment overrides win over file values.

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::logging::default_log_level;
use crate::storage::{DEFAULT_BUCKET, PHOTO_UPLOAD_LIMIT_BYTES};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "folio.toml";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    InvalidOverride { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "failed to read config `{}`: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
            Self::InvalidOverride { key, value } => {
                write!(f, "invalid value `{value}` for environment override {key}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// SQLite file standing in for the hosted database.
    pub database_path: PathBuf,
    /// Directory of the local document mirror.
    pub cache_dir: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub autosave_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub bucket: String,
    pub public_base_url: String,
    pub photo_upload_limit_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("folio.sqlite3"),
            cache_dir: PathBuf::from(".folio-cache"),
            log_level: default_log_level().to_string(),
            log_dir: None,
            storage: StorageConfig::default(),
            admin: AdminConfig::default(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            public_base_url: "http://localhost:8080/storage".to_string(),
            photo_upload_limit_bytes: PHOTO_UPLOAD_LIMIT_BYTES,
        }
    }
}

impl FolioConfig {
    /// Reads `path` (when it exists) and applies process environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads `path`; a missing file yields defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text).map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|err| err.to_string())
    }

    /// Applies `FOLIO_*` overrides looked up through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("FOLIO_DATABASE_PATH") {
            self.database_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("FOLIO_CACHE_DIR") {
            self.cache_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("FOLIO_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("FOLIO_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("FOLIO_PUBLIC_BASE_URL") {
            self.storage.public_base_url = value;
        }
        if let Some(value) = lookup("FOLIO_ADMIN_EMAIL") {
            self.admin.email = value;
        }
        if let Some(value) = lookup("FOLIO_ADMIN_PASSWORD") {
            self.admin.password = value;
        }
        if let Some(value) = lookup("FOLIO_AUTOSAVE_DELAY_MS") {
            let parsed = value.trim().parse::<u64>();
            self.autosave_delay_ms = parsed.map_err(|_| ConfigError::InvalidOverride {
                key: "FOLIO_AUTOSAVE_DELAY_MS",
                value,
            })?;
        }
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FolioConfig};
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FolioConfig::from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = FolioConfig::from_toml_str(
            "database_path = \"/srv/folio.db\"\n[storage]\nbucket = \"media\"\n",
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/folio.db"));
        assert_eq!(config.storage.bucket, "media");
        assert_eq!(config.autosave_delay_ms, 1000);
        assert_eq!(config.storage.photo_upload_limit_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FolioConfig::from_toml_str("databse_path = \"x\"").is_err());
    }

    #[test]
    fn environment_overrides_win() {
        let mut config = FolioConfig::default();
        config
            .apply_overrides(|key| match key {
                "FOLIO_ADMIN_EMAIL" => Some("me@example.com".to_string()),
                "FOLIO_AUTOSAVE_DELAY_MS" => Some("250".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.admin.email, "me@example.com");
        assert_eq!(config.autosave_delay_ms, 250);
    }

    #[test]
    fn malformed_override_is_reported() {
        let mut config = FolioConfig::default();
        let err = config
            .apply_overrides(|key| (key == "FOLIO_AUTOSAVE_DELAY_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }
}
