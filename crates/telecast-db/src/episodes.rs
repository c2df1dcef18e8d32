//! Episode rows and their relationship projections.

use rusqlite::Connection;

use crate::error::StoreError;
use crate::series::{Series, map_series_row};
use crate::streams::Stream;

/// An episode of a series, backed by a playable stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Episode ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Display sequence within the series; not required to be unique.
    pub order: i64,
    /// Owning series (FK → `series.id`).
    pub series_id: String,
    /// Backing stream (FK → `stream.id`).
    pub stream_id: String,
    /// Premium-only flag.
    pub premium: bool,
}

/// Column list shared by every episode SELECT.
const EPISODE_COLUMNS: &str =
    "id, title, description, thumbnail_url, display_order, series_id, stream_id, premium";

/// Maps a database row to an `Episode`.
fn map_episode_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Episode> {
    Ok(Episode {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        thumbnail_url: row.get(3)?,
        order: row.get(4)?,
        series_id: row.get(5)?,
        stream_id: row.get(6)?,
        premium: row.get(7)?,
    })
}

/// Inserts episodes; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if `series_id` or `stream_id` does
/// not resolve to an existing row, or on a duplicate id.
pub fn insert_episodes(conn: &Connection, rows: &[Episode]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO episode (
            id, title, description, thumbnail_url,
            display_order, series_id, stream_id, premium
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for row in rows {
        stmt.execute(rusqlite::params![
            row.id,
            row.title,
            row.description,
            row.thumbnail_url,
            row.order,
            row.series_id,
            row.stream_id,
            row.premium,
        ])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up an episode by id. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_episode(conn: &Connection, id: &str) -> Result<Option<Episode>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EPISODE_COLUMNS} FROM episode WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map([id], map_episode_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Loads the episodes of a series in display order.
///
/// Ties on `display_order` break by id, so the sequence never depends
/// on insertion order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_episodes_by_series(
    conn: &Connection,
    series_id: &str,
) -> Result<Vec<Episode>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EPISODE_COLUMNS} FROM episode
         WHERE series_id = ?1
         ORDER BY display_order, id"
    ))?;
    let rows = stmt.query_map([series_id], map_episode_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Projects the owning series of an episode as a computed join; the
/// result always reflects the current series row.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn series_of_episode(conn: &Connection, episode_id: &str) -> Result<Option<Series>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.title, s.description, s.thumbnail_url FROM series s
         JOIN episode e ON e.series_id = s.id
         WHERE e.id = ?1",
    )?;
    let mut rows = stmt.query_map([episode_id], map_series_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Projects the backing stream of an episode as a computed join.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn stream_of_episode(conn: &Connection, episode_id: &str) -> Result<Option<Stream>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.number_of_chunks FROM stream s
         JOIN episode e ON e.stream_id = s.id
         WHERE e.id = ?1",
    )?;
    let mut rows = stmt.query_map([episode_id], |row| {
        Ok(Stream {
            id: row.get(0)?,
            number_of_chunks: row.get(1)?,
        })
    })?;
    rows.next().transpose().map_err(Into::into)
}

/// Deletes an episode. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if any program or recommended
/// item still references the episode.
pub fn delete_episode(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM episode WHERE id = ?1", [id])
        .map_err(Into::into)
}
