//! Channel rows.

use rusqlite::Connection;

use crate::error::StoreError;

/// A broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel ID.
    pub id: String,
    /// Channel display name.
    pub name: String,
    /// Channel logo image URL.
    pub logo_url: String,
}

/// Maps a database row to a `Channel`.
pub(crate) fn map_channel_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        logo_url: row.get(2)?,
    })
}

/// Inserts channels; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] on a duplicate id.
pub fn insert_channels(conn: &Connection, rows: &[Channel]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare("INSERT INTO channel (id, name, logo_url) VALUES (?1, ?2, ?3)")?;
    for row in rows {
        stmt.execute(rusqlite::params![row.id, row.name, row.logo_url])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up a channel by id. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_channel(conn: &Connection, id: &str) -> Result<Option<Channel>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, logo_url FROM channel WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_channel_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Loads all channels, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_channels(conn: &Connection) -> Result<Vec<Channel>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, logo_url FROM channel ORDER BY id")?;
    let rows = stmt.query_map([], map_channel_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Deletes a channel. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if any program still references
/// the channel.
pub fn delete_channel(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM channel WHERE id = ?1", [id])
        .map_err(Into::into)
}
