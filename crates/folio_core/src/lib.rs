//! Content core for the Folio portfolio site.
//! This crate is the single source of truth for content invariants.

pub mod auth;
pub mod autosave;
pub mod backend;
pub mod cache;
pub mod config;
pub mod db;
pub mod editor;
pub mod image;
pub mod logging;
pub mod merge;
pub mod model;
pub mod storage;
pub mod store;
pub mod theme_css;

pub use auth::{AdminAuth, AuthError, Session};
pub use autosave::{AutoSave, Draft, SaveStatus};
pub use backend::{BackendError, BackendResult, ContentBackend, SqliteContentBackend};
pub use cache::{ContentCache, FileCache, MemoryCache};
pub use config::{ConfigError, FolioConfig};
pub use image::{parse_image_ref, with_focal_point, FocalPoint, ImageRef};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use merge::merge_with_defaults;
pub use model::defaults::initial_document;
pub use model::document::{
    Album, Contact, ElementStyle, ElementStyles, HomeContent, PageContent, Photo,
    PortfolioDocument, Profile, Testimonial, TextWork, ThemeColors, ThemeConfig, ThemeFontSizes,
    ThemeFonts, DOCUMENT_ROW_ID,
};
pub use storage::{upload_file, ObjectStore, SqliteObjectStore, UploadError};
pub use store::{ContentStore, LoadSource, SaveFailure, SaveOutcome};
pub use theme_css::{css_variables, render_root_stylesheet};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
