use health_core::db::migrations::latest_version;
use health_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "health_plans");
    assert_table_exists(&conn, "beneficiaries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("health.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "beneficiaries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

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
}

#[test]
fn live_names_are_unique_ignoring_unicode_case() {
    let conn = open_db_in_memory().unwrap();
    insert_plan(&conn, "a", "Plano Saúde", "123456", None);

    let duplicate = conn.execute(
        "INSERT INTO health_plans (id, name, ans_registration_code, created_at)
         VALUES ('b', 'PLANO SAÚDE', '654321', 0);",
        [],
    );
    assert!(duplicate.is_err());
}

#[test]
fn tombstoned_rows_release_unique_values() {
    let conn = open_db_in_memory().unwrap();
    insert_plan(&conn, "a", "Plano Ouro", "123456", Some(1));
    insert_plan(&conn, "b", "Plano Ouro", "123456", None);

    let live: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM health_plans WHERE deleted_at IS NULL;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(live, 1);
}

#[test]
fn beneficiaries_require_existing_plan_and_block_hard_delete() {
    let conn = open_db_in_memory().unwrap();

    let orphan = conn.execute(
        "INSERT INTO beneficiaries (id, full_name, cpf, status, birth_date, health_plan_id, created_at)
         VALUES ('x', 'Maria Silva', '52998224725', 'Active', '1990-01-01', 'missing', 0);",
        [],
    );
    assert!(orphan.is_err());

    insert_plan(&conn, "plan", "Plano Ouro", "123456", None);
    conn.execute(
        "INSERT INTO beneficiaries (id, full_name, cpf, status, birth_date, health_plan_id, created_at)
         VALUES ('x', 'Maria Silva', '52998224725', 'Active', '1990-01-01', 'plan', 0);",
        [],
    )
    .unwrap();

    assert!(conn
        .execute("DELETE FROM health_plans WHERE id = 'plan';", [])
        .is_err());
}

#[test]
fn casefold_function_is_registered() {
    let conn = open_db_in_memory().unwrap();
    let folded: String = conn
        .query_row("SELECT casefold('ÁGUA Viva');", [], |row| row.get(0))
        .unwrap();
    assert_eq!(folded, "água viva");
}

fn insert_plan(conn: &Connection, id: &str, name: &str, code: &str, deleted_at: Option<i64>) {
    conn.execute(
        "INSERT INTO health_plans (id, name, ans_registration_code, created_at, deleted_at)
         VALUES (?1, ?2, ?3, 0, ?4);",
        params![id, name, code, deleted_at],
    )
    .unwrap();
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
