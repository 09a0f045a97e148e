use locklist_core::db::migrations::latest_version;
use locklist_core::db::{open_db, open_db_in_memory, DbError};
use locklist_core::{SqliteKeyValueStore, StoreError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "secure_kv");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locklist.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO secure_kv (key, value) VALUES ('k', 'v');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let value: String = second
        .query_row("SELECT value FROM secure_kv WHERE key = 'k';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(value, "v");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let store_err = SqliteKeyValueStore::open(&path).err().expect("store open must fail");
    assert!(matches!(
        store_err,
        StoreError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn open_failure_names_the_store_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("locklist.db");

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_open_failed");
    match &err {
        DbError::Open { location, .. } => assert_eq!(location, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("missing"));
    assert_eq!(
        DbError::UnsupportedSchemaVersion {
            db_version: 2,
            latest_supported: 1,
        }
        .code(),
        "db_schema_too_new"
    );
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
