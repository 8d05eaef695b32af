//! Content store: the single in-memory copy of the site document.
//!
//! # Responsibility
//! - Load the document from the backend, degrading to the local cache and
//!   then to the compiled-in defaults.
//! - Apply section updates optimistically and push the whole document.
//!
//! # Invariants
//! - Write order is memory, then cache mirror, then backend upsert.
//! - A failed upsert never rolls back memory or cache; local state stays
//!   ahead of remote state until the next successful write.
//! - Load never fails; the store always holds a complete document.

use crate::backend::{BackendError, ContentBackend};
use crate::cache::ContentCache;
use crate::merge::merge_with_defaults;
use crate::model::defaults::initial_document;
use crate::model::document::{
    Album, HomeContent, PageContent, PortfolioDocument, Profile, Testimonial, TextWork,
    ThemeConfig, DOCUMENT_ROW_ID,
};
use crate::theme_css::css_variables;
use log::{error, info, warn};
use std::time::Instant;

/// Where the loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The stored row, merged with defaults.
    Remote,
    /// No row existed; defaults were written as the first row.
    Initialized,
    /// The backend failed; the local mirror was used.
    Cache,
    /// Backend and cache both failed.
    Defaults,
}

impl LoadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Initialized => "initialized",
            Self::Cache => "cache",
            Self::Defaults => "defaults",
        }
    }
}

/// Inline-displayable reason a save did not reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub code: &'static str,
    pub message: String,
}

impl SaveFailure {
    fn from_backend(err: &BackendError) -> Self {
        let message = match err {
            BackendError::PermissionDenied => {
                "Session expired or no permission to save. Please sign in again on the admin page."
                    .to_string()
            }
            BackendError::MissingTable(table) => {
                format!("Error: the table '{table}' does not exist in the database.")
            }
            _ => "Could not save to the server. Changes are kept on this device.".to_string(),
        };
        Self {
            code: err.code(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(SaveFailure),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

pub struct ContentStore<B: ContentBackend, C: ContentCache> {
    backend: B,
    cache: C,
    document: PortfolioDocument,
    loaded: bool,
}

impl<B: ContentBackend, C: ContentCache> ContentStore<B, C> {
    /// Creates a store holding the defaults; call [`Self::load`] next.
    pub fn new(backend: B, cache: C) -> Self {
        Self {
            backend,
            cache,
            document: initial_document(),
            loaded: false,
        }
    }

    /// Fetches the document, falling back as needed, and mirrors the result
    /// to the cache.
    pub fn load(&mut self) -> LoadSource {
        let started_at = Instant::now();

        let source = match self.backend.fetch(DOCUMENT_ROW_ID) {
            Ok(Some(value)) => {
                self.document = merge_with_defaults(&value);
                LoadSource::Remote
            }
            Ok(None) => self.initialize_remote(),
            Err(err) => {
                match &err {
                    BackendError::MissingTable(table) => warn!(
                        "event=content_load module=store status=fallback error_code={} table={}",
                        err.code(),
                        table
                    ),
                    _ => error!(
                        "event=content_load module=store status=fallback error_code={} error={}",
                        err.code(),
                        err
                    ),
                }
                self.load_from_cache()
            }
        };

        self.loaded = true;
        self.cache.store(&self.document);
        info!(
            "event=content_load module=store status=ok source={} duration_ms={}",
            source.as_str(),
            started_at.elapsed().as_millis()
        );
        source
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn document(&self) -> &PortfolioDocument {
        &self.document
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access, e.g. to attach an admin session.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Theme tokens of the current document as CSS custom properties.
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        css_variables(&self.document.theme)
    }

    pub fn update_profile(&mut self, profile: Profile) -> SaveOutcome {
        self.apply_edit("profile", |doc| doc.profile = profile)
    }

    pub fn update_albums(&mut self, albums: Vec<Album>) -> SaveOutcome {
        self.apply_edit("albums", |doc| doc.albums = albums)
    }

    pub fn update_writings(&mut self, writings: Vec<TextWork>) -> SaveOutcome {
        self.apply_edit("writings", |doc| doc.writings = writings)
    }

    pub fn update_testimonials(&mut self, testimonials: Vec<Testimonial>) -> SaveOutcome {
        self.apply_edit("testimonials", |doc| doc.testimonials = testimonials)
    }

    pub fn update_theme(&mut self, theme: ThemeConfig) -> SaveOutcome {
        self.apply_edit("theme", |doc| doc.theme = theme)
    }

    pub fn update_home(&mut self, home: HomeContent) -> SaveOutcome {
        self.apply_edit("home", |doc| doc.home = home)
    }

    pub fn update_portfolio_page(&mut self, page: PageContent) -> SaveOutcome {
        self.apply_edit("portfolio_page", |doc| doc.portfolio_page = page)
    }

    pub fn update_writings_page(&mut self, page: PageContent) -> SaveOutcome {
        self.apply_edit("writings_page", |doc| doc.writings_page = page)
    }

    /// Replaces everything with the defaults and pushes them.
    pub fn reset_data(&mut self) -> SaveOutcome {
        self.apply_edit("all", |doc| *doc = initial_document())
    }

    /// Applies `edit` in memory, then mirrors and pushes the whole document.
    pub fn apply_edit(
        &mut self,
        section: &str,
        edit: impl FnOnce(&mut PortfolioDocument),
    ) -> SaveOutcome {
        edit(&mut self.document);
        self.cache.store(&self.document);
        self.push(section)
    }

    fn push(&self, section: &str) -> SaveOutcome {
        let started_at = Instant::now();
        let value = match serde_json::to_value(&self.document) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "event=content_save module=store status=error section={} error_code=encode_failed error={}",
                    section, err
                );
                return SaveOutcome::Failed(SaveFailure {
                    code: "encode_failed",
                    message: "Could not encode the document.".to_string(),
                });
            }
        };

        match self.backend.upsert(DOCUMENT_ROW_ID, &value) {
            Ok(()) => {
                info!(
                    "event=content_save module=store status=ok section={} duration_ms={}",
                    section,
                    started_at.elapsed().as_millis()
                );
                SaveOutcome::Saved
            }
            Err(err) => {
                error!(
                    "event=content_save module=store status=error section={} duration_ms={} error_code={} error={}",
                    section,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                SaveOutcome::Failed(SaveFailure::from_backend(&err))
            }
        }
    }

    fn initialize_remote(&mut self) -> LoadSource {
        info!("event=content_load module=store status=empty action=initialize");
        let initial = initial_document();
        let inserted = serde_json::to_value(&initial)
            .map_err(|err| BackendError::InvalidData(err.to_string()))
            .and_then(|value| self.backend.insert(DOCUMENT_ROW_ID, &value));

        match inserted {
            Ok(()) => {
                self.document = initial;
                LoadSource::Initialized
            }
            Err(err) => {
                warn!(
                    "event=content_init module=store status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                self.load_from_cache()
            }
        }
    }

    fn load_from_cache(&mut self) -> LoadSource {
        match self.cache.load() {
            Some(value) => {
                self.document = merge_with_defaults(&value);
                LoadSource::Cache
            }
            None => {
                self.document = initial_document();
                LoadSource::Defaults
            }
        }
    }
}
