use folio_core::db::open_db_in_memory;
use folio_core::backend::CONTENT_TABLE;
use folio_core::{AdminAuth, BackendError, ContentBackend, SqliteContentBackend, DOCUMENT_ROW_ID};
use serde_json::json;
use std::sync::Arc;

fn auth() -> Arc<AdminAuth> {
    Arc::new(AdminAuth::new("Admin@Example.com", "secret"))
}

#[test]
fn reads_are_public_and_writes_need_a_session() {
    let conn = open_db_in_memory().unwrap();
    let mut backend = SqliteContentBackend::new(&conn, auth());

    assert!(backend.fetch(DOCUMENT_ROW_ID).unwrap().is_none());
    let err = backend.upsert(DOCUMENT_ROW_ID, &json!({})).unwrap_err();
    assert!(matches!(err, BackendError::PermissionDenied));
    assert_eq!(err.code(), "permission_denied");

    let admin = auth();
    let session = admin.sign_in("admin@example.com", "secret").unwrap();
    backend.set_session(Some(session));
    assert!(
        matches!(backend.upsert(DOCUMENT_ROW_ID, &json!({})), Err(BackendError::PermissionDenied)),
        "sessions from another auth instance are not accepted"
    );
}

#[test]
fn upsert_replaces_the_whole_row() {
    let conn = open_db_in_memory().unwrap();
    let admin = auth();
    let session = admin.sign_in(" ADMIN@example.com ", "secret").unwrap();
    let mut backend = SqliteContentBackend::new(&conn, admin);
    backend.set_session(Some(session));

    backend
        .upsert(DOCUMENT_ROW_ID, &json!({ "profile": { "name": "A" }, "albums": [] }))
        .unwrap();
    backend
        .upsert(DOCUMENT_ROW_ID, &json!({ "profile": { "name": "B" } }))
        .unwrap();

    let stored = backend.fetch(DOCUMENT_ROW_ID).unwrap().unwrap();
    assert_eq!(stored, json!({ "profile": { "name": "B" } }));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM portfolio_config;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn second_insert_reports_conflict() {
    let conn = open_db_in_memory().unwrap();
    let admin = auth();
    let session = admin.sign_in("admin@example.com", "secret").unwrap();
    let mut backend = SqliteContentBackend::new(&conn, admin);
    backend.set_session(Some(session));

    backend.insert(DOCUMENT_ROW_ID, &json!({})).unwrap();
    let err = backend.insert(DOCUMENT_ROW_ID, &json!({})).unwrap_err();
    assert!(matches!(err, BackendError::Conflict(_)));
}

#[test]
fn corrupt_row_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO portfolio_config (id, content) VALUES (?1, 'not json');",
        [DOCUMENT_ROW_ID],
    )
    .unwrap();

    let backend = SqliteContentBackend::new(&conn, auth());
    let err = backend.fetch(DOCUMENT_ROW_ID).unwrap_err();
    assert!(matches!(err, BackendError::InvalidData(_)));
}

#[test]
fn dropped_table_is_reported_by_name() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE portfolio_config;").unwrap();

    let backend = SqliteContentBackend::new(&conn, auth());
    match backend.fetch(DOCUMENT_ROW_ID).unwrap_err() {
        BackendError::MissingTable(table) => assert_eq!(table, CONTENT_TABLE),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn null_document_reads_as_missing_row() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO portfolio_config (id, content) VALUES (?1, 'null');",
        [DOCUMENT_ROW_ID],
    )
    .unwrap();

    let backend = SqliteContentBackend::new(&conn, auth());
    assert!(backend.fetch(DOCUMENT_ROW_ID).unwrap().is_none());
}
