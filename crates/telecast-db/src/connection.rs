//! Database connection management.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::StoreError;
use crate::migrations::run_migrations;

/// Opens (or creates) the database and runs migrations.
///
/// - If `dir` is `Some`, uses `{dir}/telecast.db`.
/// - Otherwise uses `~/.local/share/telecast/telecast.db`.
///
/// Foreign-key enforcement is switched on for the connection; SQLite
/// leaves the pragma off by default and the store depends on it.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrations fail.
pub fn open_db(dir: Option<&PathBuf>) -> Result<Connection, StoreError> {
    let db_path = resolve_db_path(dir)?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!(path = %db_path.display(), "opening database");
    let conn = Connection::open(&db_path)?;
    init_connection(&conn)?;
    Ok(conn)
}

/// Opens an in-memory database with the full schema, for tests and
/// ephemeral use.
///
/// # Errors
///
/// Returns an error if migrations fail.
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    init_connection(&conn)?;
    Ok(conn)
}

/// Enables FK enforcement and brings the schema up to date.
fn init_connection(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "foreign_keys", true)?;
    run_migrations(conn)?;
    Ok(())
}

/// Resolves the database file path.
fn resolve_db_path(dir: Option<&PathBuf>) -> Result<PathBuf, StoreError> {
    if let Some(d) = dir {
        return Ok(d.join("telecast.db"));
    }

    let home = std::env::var("HOME")
        .map_err(|_| std::io::Error::other("HOME environment variable is not set"))?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("telecast")
        .join("telecast.db"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_db_in_temp_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();

        // Act
        let conn = open_db(Some(&dir_path)).unwrap();

        // Assert
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert!(version > 0);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        // Arrange & Act
        let conn = open_in_memory().unwrap();

        // Assert
        let enabled: bool = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn test_resolve_db_path_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/myproject");

        // Act
        let path = resolve_db_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/myproject/telecast.db"));
    }

    #[test]
    fn test_resolve_db_path_default() {
        // Arrange & Act
        let path = resolve_db_path(None).unwrap();

        // Assert
        assert!(path.ends_with(".local/share/telecast/telecast.db"));
    }
}
