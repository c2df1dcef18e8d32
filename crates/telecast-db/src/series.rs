//! Series rows.

use rusqlite::Connection;

use crate::error::StoreError;

/// A series grouping episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    /// Series ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
}

/// Maps a database row to a `Series`.
pub(crate) fn map_series_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Series> {
    Ok(Series {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        thumbnail_url: row.get(3)?,
    })
}

/// Column list shared by every series SELECT.
pub(crate) const SERIES_COLUMNS: &str = "id, title, description, thumbnail_url";

/// Inserts series; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] on a duplicate id.
pub fn insert_series(conn: &Connection, rows: &[Series]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO series (id, title, description, thumbnail_url) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for row in rows {
        stmt.execute(rusqlite::params![
            row.id,
            row.title,
            row.description,
            row.thumbnail_url
        ])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up a series by id. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_series(conn: &Connection, id: &str) -> Result<Option<Series>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {SERIES_COLUMNS} FROM series WHERE id = ?1"))?;
    let mut rows = stmt.query_map([id], map_series_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Loads all series, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_series(conn: &Connection) -> Result<Vec<Series>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {SERIES_COLUMNS} FROM series ORDER BY id"))?;
    let rows = stmt.query_map([], map_series_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Deletes a series. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if any episode or recommended
/// item still references the series.
pub fn delete_series(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM series WHERE id = ?1", [id])
        .map_err(Into::into)
}
