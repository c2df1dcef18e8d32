//! User account rows.

use rusqlite::Connection;

use crate::error::StoreError;

/// A user account. The store only holds the row; authentication is the
/// calling layer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User ID, assigned by the seeder.
    pub id: i64,
    /// Login email; unique across all users.
    pub email: String,
    /// Stored password value, opaque to the store.
    pub password: String,
}

/// Maps a database row to a `User`.
fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
    })
}

/// Inserts users; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] on a duplicate id or email.
pub fn insert_users(conn: &Connection, rows: &[User]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare("INSERT INTO user (id, email, password) VALUES (?1, ?2, ?3)")?;
    for row in rows {
        stmt.execute(rusqlite::params![row.id, row.email, row.password])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up a user by id. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, email, password FROM user WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_user_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Looks up a user by email. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, email, password FROM user WHERE email = ?1")?;
    let mut rows = stmt.query_map([email], map_user_row)?;
    rows.next().transpose().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::connection::open_in_memory;

    fn make_user(id: i64, email: &str) -> User {
        User {
            id,
            email: String::from(email),
            password: String::from("hunter2"),
        }
    }

    #[test]
    fn test_insert_and_get_user() {
        // Arrange
        let conn = open_in_memory().unwrap();
        let user = make_user(1, "alice@example.com");

        // Act
        insert_users(&conn, std::slice::from_ref(&user)).unwrap();

        // Assert
        assert_eq!(get_user(&conn, 1).unwrap().unwrap(), user);
        assert_eq!(
            get_user_by_email(&conn, "alice@example.com").unwrap().unwrap(),
            user
        );
    }

    #[test]
    fn test_duplicate_email_is_integrity_error() {
        // Arrange
        let conn = open_in_memory().unwrap();
        insert_users(&conn, &[make_user(1, "alice@example.com")]).unwrap();

        // Act
        let err = insert_users(&conn, &[make_user(2, "alice@example.com")]).unwrap_err();

        // Assert
        assert!(err.is_integrity());
        assert!(get_user(&conn, 2).unwrap().is_none());
    }

    #[test]
    fn test_missing_user_is_none() {
        // Arrange
        let conn = open_in_memory().unwrap();

        // Act & Assert
        assert!(get_user(&conn, 42).unwrap().is_none());
        assert!(get_user_by_email(&conn, "nobody@example.com").unwrap().is_none());
    }
}
