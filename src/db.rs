use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Result, Row};

use crate::error::AppError;
use crate::models::{Category, Todo};
use crate::validate::FieldError;

pub type DbPool = Arc<Mutex<Connection>>;

/// Storage location that selects a transient database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task TEXT NOT NULL,
        done BOOLEAN NOT NULL CHECK (done IN (0, 1)),
        category_id INTEGER NOT NULL,
        FOREIGN KEY (category_id) REFERENCES categories (id)
    );
";

/// Opens a handle on `location` with foreign keys enforced.
pub fn open_db(location: &str) -> Result<Connection> {
    let conn = if location == IN_MEMORY {
        Connection::open_in_memory()?
    } else {
        Connection::open(location)?
    };
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

pub fn close_db(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, err)| err)
}

/// Opens `location` and makes sure both tables exist. Safe to repeat.
pub fn create_db(location: &str) -> Result<Connection> {
    let conn = open_db(location)?;
    create_schema(&conn)?;
    Ok(conn)
}

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
}

pub fn init_db(location: &str) -> Result<DbPool> {
    Ok(Arc::new(Mutex::new(create_db(location)?)))
}

/// Closes the shared handle once nothing else holds it.
pub fn release(pool: DbPool) -> Result<()> {
    match Arc::try_unwrap(pool) {
        Ok(mutex) => {
            let conn = mutex
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            close_db(conn)
        }
        Err(_) => {
            tracing::warn!("Connection still shared at shutdown, leaving it to drop");
            Ok(())
        }
    }
}

fn lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock()
        .map_err(|_| AppError::Database("connection lock poisoned".to_string()))
}

fn category_from_row(row: &Row<'_>) -> Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn todo_from_row(row: &Row<'_>) -> Result<Todo> {
    Ok(Todo {
        id: row.get("id")?,
        task: row.get("task")?,
        done: row.get("done")?,
        category_id: row.get("category_id")?,
    })
}

// Category operations
pub fn list_categories(pool: &DbPool) -> Result<Vec<Category>, AppError> {
    let conn = lock(pool)?;
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id ASC")?;
    let categories = stmt
        .query_map([], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn create_category(pool: &DbPool, name: &str) -> Result<i64, AppError> {
    let conn = lock(pool)?;
    conn.execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

// Todo operations
pub fn list_todos(pool: &DbPool) -> Result<Vec<Todo>, AppError> {
    let conn = lock(pool)?;
    let mut stmt =
        conn.prepare("SELECT id, task, done, category_id FROM todos ORDER BY id ASC")?;
    let todos = stmt
        .query_map([], todo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(todos)
}

/// Inserts a not-yet-done todo. A `category_id` naming no category is
/// rejected by the foreign key and reported against that field.
pub fn create_todo(pool: &DbPool, task: &str, category_id: i64) -> Result<i64, AppError> {
    let conn = lock(pool)?;
    conn.execute(
        "INSERT INTO todos (task, done, category_id) VALUES (?1, ?2, ?3)",
        (task, false, category_id),
    )
    .map_err(|err| {
        if is_foreign_key_violation(&err) {
            AppError::Validation(vec![FieldError::new(
                "category_id",
                "Category does not exist.",
            )])
        } else {
            AppError::from(err)
        }
    })?;
    Ok(conn.last_insert_rowid())
}

/// Flips `done` and returns the new value, or `None` if no todo has `id`.
pub fn toggle_todo(pool: &DbPool, id: i64) -> Result<Option<bool>, AppError> {
    let conn = lock(pool)?;
    let done = conn
        .query_row(
            "UPDATE todos SET done = NOT done WHERE id = ?1 RETURNING done",
            [id],
            |row| row.get::<_, bool>(0),
        )
        .optional()?;
    Ok(done)
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
