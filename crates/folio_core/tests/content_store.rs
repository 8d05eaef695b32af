use folio_core::db::{open_db, open_db_in_memory};
use folio_core::{
    initial_document, AdminAuth, BackendError, BackendResult, ContentBackend, ContentCache,
    ContentStore, FileCache, LoadSource, MemoryCache, PageContent, PortfolioDocument,
    SaveOutcome, SqliteContentBackend, DOCUMENT_ROW_ID,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn admin() -> Arc<AdminAuth> {
    Arc::new(AdminAuth::new("admin@example.com", "secret"))
}

fn signed_in_backend(conn: &rusqlite::Connection) -> SqliteContentBackend<'_> {
    let auth = admin();
    let session = auth.sign_in("admin@example.com", "secret").unwrap();
    let mut backend = SqliteContentBackend::new(conn, auth);
    backend.set_session(Some(session));
    backend
}

#[test]
fn empty_table_is_initialized_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::new(signed_in_backend(&conn), MemoryCache::new());

    assert_eq!(store.load(), LoadSource::Initialized);
    assert!(store.is_loaded());
    assert_eq!(store.document(), &initial_document());

    let stored = store.backend().fetch(DOCUMENT_ROW_ID).unwrap().unwrap();
    assert_eq!(stored["profile"]["name"], initial_document().profile.name);
}

#[test]
fn partial_remote_document_is_merged_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let backend = signed_in_backend(&conn);
    backend
        .upsert(
            DOCUMENT_ROW_ID,
            &json!({ "profile": { "name": "Remote Name", "bio": "One line" }, "albums": null }),
        )
        .unwrap();

    let mut store = ContentStore::new(backend, MemoryCache::new());
    assert_eq!(store.load(), LoadSource::Remote);

    let doc = store.document();
    assert_eq!(doc.profile.name, "Remote Name");
    assert_eq!(doc.profile.bio, vec!["One line".to_string()]);
    assert_eq!(doc.albums, initial_document().albums);
    assert_eq!(doc.theme, initial_document().theme);
}

#[test]
fn anonymous_load_without_row_falls_back_to_cache() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteContentBackend::new(&conn, admin());
    let cache = MemoryCache::with_value(json!({ "home": { "heroTitle": "From cache" } }));

    let mut store = ContentStore::new(backend, cache);
    assert_eq!(store.load(), LoadSource::Cache);
    assert_eq!(store.document().home.hero_title, "From cache");
    assert_eq!(
        store.document().home.hero_subtitle,
        initial_document().home.hero_subtitle
    );
}

#[test]
fn missing_table_without_cache_uses_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE portfolio_config;").unwrap();
    let backend = signed_in_backend(&conn);

    let err = backend.fetch(DOCUMENT_ROW_ID).unwrap_err();
    assert!(matches!(err, BackendError::MissingTable(_)));

    let mut store = ContentStore::new(backend, MemoryCache::new());
    assert_eq!(store.load(), LoadSource::Defaults);
    assert_eq!(store.document(), &initial_document());
    assert!(store.cache().load().is_some(), "load mirrors the result to cache");
}

#[test]
fn null_row_takes_the_initialize_path() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO portfolio_config (id, content) VALUES (?1, 'null');",
        [DOCUMENT_ROW_ID],
    )
    .unwrap();

    let cache = MemoryCache::with_value(json!({ "profile": { "name": "Cached" } }));
    let mut store = ContentStore::new(signed_in_backend(&conn), cache);
    assert_eq!(store.load(), LoadSource::Cache);
    assert_eq!(store.document().profile.name, "Cached");

    let mut store = ContentStore::new(signed_in_backend(&conn), MemoryCache::new());
    assert_eq!(store.load(), LoadSource::Defaults);
}

#[test]
fn update_persists_whole_document() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::new(signed_in_backend(&conn), MemoryCache::new());
    store.load();

    let page = PageContent {
        title: "Works".to_string(),
        description: "Selected series".to_string(),
    };
    assert_eq!(store.update_portfolio_page(page.clone()), SaveOutcome::Saved);

    let stored = store.backend().fetch(DOCUMENT_ROW_ID).unwrap().unwrap();
    assert_eq!(stored["portfolioPage"]["title"], "Works");
    assert!(stored["albums"].is_array());
    assert_eq!(store.document().portfolio_page, page);
}

#[test]
fn failed_write_keeps_local_state_and_reports_permission_message() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::new(SqliteContentBackend::new(&conn, admin()), MemoryCache::new());
    store.load();

    let mut profile = store.document().profile.clone();
    profile.name = "Offline Edit".to_string();
    let outcome = store.update_profile(profile);

    match outcome {
        SaveOutcome::Failed(failure) => {
            assert_eq!(failure.code, "permission_denied");
            assert!(failure.message.contains("sign in again"));
        }
        SaveOutcome::Saved => panic!("anonymous write must fail"),
    }
    assert_eq!(store.document().profile.name, "Offline Edit");
    assert_eq!(store.cache().load().unwrap()["profile"]["name"], "Offline Edit");
    assert!(store.backend().fetch(DOCUMENT_ROW_ID).unwrap().is_none());
}

#[test]
fn reset_writes_defaults_back() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::new(signed_in_backend(&conn), MemoryCache::new());
    store.load();
    store.update_albums(Vec::new());
    assert!(store.document().albums.is_empty());

    assert!(store.reset_data().is_saved());
    assert_eq!(store.document(), &initial_document());
    let stored = store.backend().fetch(DOCUMENT_ROW_ID).unwrap().unwrap();
    assert_eq!(
        stored["albums"].as_array().map(Vec::len),
        Some(initial_document().albums.len())
    );
}

#[test]
fn file_cache_survives_restart_when_backend_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("folio.sqlite3");
    let cache_dir = dir.path().join("cache");

    {
        let conn = open_db(&db_path).unwrap();
        let mut store = ContentStore::new(signed_in_backend(&conn), FileCache::new(&cache_dir));
        store.load();
        let mut home = store.document().home.clone();
        home.welcome_label = "Olá".to_string();
        assert!(store.update_home(home).is_saved());
    }

    let conn = open_db(&db_path).unwrap();
    conn.execute_batch("DROP TABLE portfolio_config;").unwrap();
    let mut store = ContentStore::new(SqliteContentBackend::new(&conn, admin()), FileCache::new(&cache_dir));
    assert_eq!(store.load(), LoadSource::Cache);
    assert_eq!(store.document().home.welcome_label, "Olá");
}

/// Cache whose contents the test backend can observe.
#[derive(Clone, Default)]
struct SharedCache(Rc<RefCell<Option<Value>>>);

impl ContentCache for SharedCache {
    fn load(&self) -> Option<Value> {
        self.0.borrow().clone()
    }

    fn store(&self, document: &PortfolioDocument) {
        *self.0.borrow_mut() = Some(serde_json::to_value(document).unwrap());
    }
}

/// Backend that records what the cache held when each upsert started.
struct ObservingBackend {
    cache: SharedCache,
    seen_at_upsert: RefCell<Vec<Option<Value>>>,
    fail_writes: bool,
}

impl ContentBackend for ObservingBackend {
    fn fetch(&self, _row_id: &str) -> BackendResult<Option<Value>> {
        Err(BackendError::Unavailable("connection refused".to_string()))
    }

    fn insert(&self, _row_id: &str, _content: &Value) -> BackendResult<()> {
        Err(BackendError::Unavailable("connection refused".to_string()))
    }

    fn upsert(&self, _row_id: &str, _content: &Value) -> BackendResult<()> {
        self.seen_at_upsert.borrow_mut().push(self.cache.load());
        if self.fail_writes {
            Err(BackendError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[test]
fn local_state_is_updated_before_the_backend_write() {
    let cache = SharedCache::default();
    let backend = ObservingBackend {
        cache: cache.clone(),
        seen_at_upsert: RefCell::new(Vec::new()),
        fail_writes: true,
    };
    let mut store = ContentStore::new(backend, cache);
    assert_eq!(store.load(), LoadSource::Defaults);

    let mut theme = store.document().theme.clone();
    theme.colors.accent = "#123456".to_string();
    let outcome = store.update_theme(theme);

    assert!(!outcome.is_saved());
    let seen = store.backend().seen_at_upsert.borrow();
    assert_eq!(seen.len(), 1);
    let cached_during_write = seen[0].as_ref().unwrap();
    assert_eq!(cached_during_write["theme"]["colors"]["accent"], "#123456");
    assert_eq!(store.document().theme.colors.accent, "#123456");
}

#[test]
fn later_successful_write_carries_earlier_failed_edit() {
    let cache = SharedCache::default();
    let backend = ObservingBackend {
        cache: cache.clone(),
        seen_at_upsert: RefCell::new(Vec::new()),
        fail_writes: true,
    };
    let mut store = ContentStore::new(backend, cache);
    store.load();

    let mut home = store.document().home.clone();
    home.hero_title = "First".to_string();
    assert!(!store.update_home(home).is_saved());

    store.backend_mut().fail_writes = false;
    let mut profile = store.document().profile.clone();
    profile.role = "Second".to_string();
    assert!(store.update_profile(profile).is_saved());

    let seen = store.backend().seen_at_upsert.borrow();
    let last = seen.last().unwrap().as_ref().unwrap();
    assert_eq!(last["home"]["heroTitle"], "First");
    assert_eq!(last["profile"]["role"], "Second");
}
