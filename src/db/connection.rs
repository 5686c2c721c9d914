// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Max pooled connections. Live queries read concurrently, writes are serialised.
const MAX_POOL_SIZE: u32 = 8;

/// Default database file path
///
/// Path structure: {APP_DATA}/coursehub/coursehub.db
pub fn get_database_path() -> AppResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    Ok(app_data_dir.join("coursehub").join("coursehub.db"))
}

/// Create a connection pool over the database file at `db_path`.
///
/// The parent directory is created when missing.
/// Every connection runs in WAL mode with a busy timeout.
pub fn create_connection_pool(db_path: &Path) -> AppResult<ConnectionPool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        register_functions(conn)
    });

    let pool = Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    log::debug!("Connection pool ready at {}", db_path.display());
    Ok(pool)
}

/// SQL name of the Unicode-aware lowercase function
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Register the custom SQL functions every connection relies on.
///
/// SQLite's built-in `lower()` only folds ASCII, so title search uses
/// `unicode_lower()` which applies Rust's full Unicode lowercase mapping.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// Create a standalone in-memory connection (for testing)
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    register_functions(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_shape() {
        if let Ok(path) = get_database_path() {
            assert!(path.ends_with("coursehub/coursehub.db"));
        }
    }

    #[test]
    fn test_connection_pool_creation() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("nested").join("test.db")).unwrap();
        let conn = pool.get().unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_unicode_lower_folds_non_ascii() {
        let conn = create_test_connection().unwrap();
        let lowered: String = conn
            .query_row("SELECT unicode_lower('ÉLAN Über Straße')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "élan über straße");

        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL)", [], |row| row.get(0))
            .unwrap();
        assert!(null.is_none());
    }

    #[test]
    fn test_test_connection() {
        let conn = create_test_connection().unwrap();
        let result: i32 = conn.query_row("SELECT 1 + 1", [], |row| row.get(0)).unwrap();
        assert_eq!(result, 2);
    }
}
