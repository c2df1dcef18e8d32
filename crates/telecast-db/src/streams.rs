//! Stream rows (playable media manifests referenced by episodes).

use rusqlite::Connection;

use crate::error::StoreError;

/// A playable stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// Stream ID.
    pub id: String,
    /// Number of media chunks; immutable once set.
    pub number_of_chunks: u32,
}

/// Inserts streams; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] on a duplicate id; there is no
/// update path, `number_of_chunks` never changes after insert.
pub fn insert_streams(conn: &Connection, rows: &[Stream]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare("INSERT INTO stream (id, number_of_chunks) VALUES (?1, ?2)")?;
    for row in rows {
        stmt.execute(rusqlite::params![row.id, row.number_of_chunks])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up a stream by id. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_stream(conn: &Connection, id: &str) -> Result<Option<Stream>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, number_of_chunks FROM stream WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], |row| {
        Ok(Stream {
            id: row.get(0)?,
            number_of_chunks: row.get(1)?,
        })
    })?;
    rows.next().transpose().map_err(Into::into)
}

/// Deletes a stream. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if any episode still references
/// the stream; dependents are never orphaned or cascaded.
pub fn delete_stream(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM stream WHERE id = ?1", [id])
        .map_err(Into::into)
}
