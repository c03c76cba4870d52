use revo_core::db::migrations::{latest_version, schema_version};
use revo_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn in_memory_database_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "recordings");
    assert_index_exists(&conn, "idx_recordings_recorded_at");
    assert_index_exists(&conn, "idx_recordings_emotion");
}

#[test]
fn reopening_a_file_database_keeps_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("revo.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO recordings (id, emotion, recorded_at) VALUES (1, 'happy', '2026-10-01 09:00:00');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second).unwrap(), latest_version());
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM recordings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreachable_path_reports_open_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("revo.db");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { target, .. } => assert!(target.ends_with("revo.db")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("cannot open recordings store"));
}

#[test]
fn failed_migration_names_the_step_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE recordings (id INTEGER PRIMARY KEY);")
        .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, name, .. } => {
            assert_eq!(version, 1);
            assert_eq!(name, "recordings");
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);
}

#[test]
fn schema_rejects_unknown_emotion_and_blank_district() {
    let conn = open_db_in_memory().unwrap();
    let unknown = conn.execute(
        "INSERT INTO recordings (id, emotion, recorded_at) VALUES (1, 'bored', '2026-10-01 09:00:00');",
        [],
    );
    assert!(unknown.is_err());

    let blank = conn.execute(
        "INSERT INTO recordings (id, emotion, recorded_at, district) VALUES (2, 'happy', '2026-10-01 09:00:00', '  ');",
        [],
    );
    assert!(blank.is_err());
}

fn assert_table_exists(conn: &Connection, name: &str) {
    assert!(sqlite_object_exists(conn, "table", name), "table {name} does not exist");
}

fn assert_index_exists(conn: &Connection, name: &str) {
    assert!(sqlite_object_exists(conn, "index", name), "index {name} does not exist");
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2);",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
