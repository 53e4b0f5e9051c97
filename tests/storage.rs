use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use categodo::db::{self, DbPool};
use categodo::error::AppError;

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

fn memory_pool() -> DbPool {
    db::init_db(db::IN_MEMORY).unwrap()
}

#[test]
fn creates_both_tables() {
    let conn = db::create_db(db::IN_MEMORY).unwrap();
    assert!(table_exists(&conn, "categories"));
    assert!(table_exists(&conn, "todos"));
    db::close_db(conn).unwrap();
}

#[test]
fn schema_creation_is_idempotent_on_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");
    let path = path.to_str().unwrap();

    let conn = db::create_db(path).unwrap();
    conn.execute("INSERT INTO categories (name) VALUES ('Work')", [])
        .unwrap();
    db::close_db(conn).unwrap();

    let conn = db::create_db(path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn insert_and_list_categories_in_order() {
    let pool = memory_pool();
    let work = db::create_category(&pool, "Work").unwrap();
    let home = db::create_category(&pool, "Home").unwrap();
    assert!(work > 0);
    assert!(home > work);

    let categories = db::list_categories(&pool).unwrap();
    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Work", "Home"]);
    assert_eq!(categories[0].id, work);
}

#[test]
fn new_todo_starts_not_done() {
    let pool = memory_pool();
    let home = db::create_category(&pool, "Home").unwrap();
    let id = db::create_todo(&pool, "Clean the house", home).unwrap();

    let todos = db::list_todos(&pool).unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, id);
    assert_eq!(todos[0].task, "Clean the house");
    assert!(!todos[0].done);
    assert_eq!(todos[0].category_id, home);
}

#[test]
fn todo_with_unknown_category_is_rejected() {
    let pool = memory_pool();
    let err = db::create_todo(&pool, "Orphan", 42).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref fields) if fields[0].field == "category_id"));
    assert!(db::list_todos(&pool).unwrap().is_empty());
}

#[test]
fn done_column_only_accepts_booleans() {
    let conn = db::create_db(db::IN_MEMORY).unwrap();
    conn.execute("INSERT INTO categories (name) VALUES ('Work')", [])
        .unwrap();
    let result = conn.execute(
        "INSERT INTO todos (task, done, category_id) VALUES ('Bad', 2, 1)",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn toggle_flips_and_flips_back() {
    let pool = memory_pool();
    let work = db::create_category(&pool, "Work").unwrap();
    let id = db::create_todo(&pool, "Write report", work).unwrap();

    assert_eq!(db::toggle_todo(&pool, id).unwrap(), Some(true));
    assert!(db::list_todos(&pool).unwrap()[0].done);
    assert_eq!(db::toggle_todo(&pool, id).unwrap(), Some(false));
    assert!(!db::list_todos(&pool).unwrap()[0].done);
}

#[test]
fn toggle_unknown_todo_returns_none() {
    let pool = memory_pool();
    assert_eq!(db::toggle_todo(&pool, 7).unwrap(), None);
}

#[test]
fn release_closes_unshared_pool() {
    let pool = memory_pool();
    db::release(pool).unwrap();
}

#[test]
fn release_tolerates_shared_pool() {
    let pool = memory_pool();
    let other = Arc::clone(&pool);
    db::release(pool).unwrap();
    assert!(db::list_categories(&other).unwrap().is_empty());
}

#[test]
fn pool_from_existing_connection() {
    let conn = db::create_db(db::IN_MEMORY).unwrap();
    let pool: DbPool = Arc::new(Mutex::new(conn));
    assert_eq!(db::create_category(&pool, "Work").unwrap(), 1);
}
