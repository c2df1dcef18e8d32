//! Program rows (broadcast schedule entries).
//!
//! `start_at`/`end_at` cross this API as absolute instants; on disk
//! they are time-of-day text (`HH:MM:SS`) re-anchored to a reference
//! date on every read. The raw text form never leaves this module.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::channels::{Channel, map_channel_row};
use crate::episodes::Episode;
use crate::error::StoreError;
use crate::timecode::{decode_end, decode_start, encode};

/// A scheduled broadcast of an episode on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Program ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Broadcast start, anchored to the reference date it was read with.
    pub start_at: NaiveDateTime,
    /// Broadcast end; strictly later than `start_at`.
    pub end_at: NaiveDateTime,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Broadcasting channel (FK → `channel.id`).
    pub channel_id: String,
    /// Broadcast episode (FK → `episode.id`).
    pub episode_id: String,
}

/// A program row before its schedule columns are decoded.
struct RawProgram {
    id: String,
    title: String,
    description: String,
    start_at: String,
    end_at: String,
    thumbnail_url: String,
    channel_id: String,
    episode_id: String,
}

/// Column list shared by every program SELECT.
const PROGRAM_COLUMNS: &str =
    "id, title, description, start_at, end_at, thumbnail_url, channel_id, episode_id";

/// Maps a database row to a `RawProgram`.
fn map_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProgram> {
    Ok(RawProgram {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_at: row.get(3)?,
        end_at: row.get(4)?,
        thumbnail_url: row.get(5)?,
        channel_id: row.get(6)?,
        episode_id: row.get(7)?,
    })
}

impl RawProgram {
    /// Re-anchors the persisted time-of-day columns to `on`.
    ///
    /// `start_at` always lands on `on`; an `end_at` of `00:00:00`
    /// rolls to the following day.
    fn decode(self, on: NaiveDate) -> Result<Program, StoreError> {
        Ok(Program {
            start_at: decode_start(&self.start_at, on)?,
            end_at: decode_end(&self.end_at, on)?,
            id: self.id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            channel_id: self.channel_id,
            episode_id: self.episode_id,
        })
    }
}

/// Rejects schedules that cannot survive the time-of-day round trip.
///
/// The instants must already be ordered, and their encoded forms must
/// decode back in order on the start date. Only an end of exactly
/// midnight may cross the day boundary; anything else (a 23:00 → 01:00
/// program, a multi-day span) would silently corrupt on re-read.
fn check_schedule(program: &Program) -> Result<(), StoreError> {
    if program.end_at <= program.start_at {
        return Err(StoreError::Integrity(format!(
            "program {} must end after it starts ({} .. {})",
            program.id, program.start_at, program.end_at
        )));
    }

    let on = program.start_at.date();
    let start = decode_start(&encode(program.start_at), on)?;
    let end = decode_end(&encode(program.end_at), on)?;
    if end <= start || start != program.start_at || end != program.end_at {
        return Err(StoreError::Integrity(format!(
            "program {} schedule does not survive the time-of-day encoding ({} .. {})",
            program.id, program.start_at, program.end_at
        )));
    }

    Ok(())
}

/// Inserts programs; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if `channel_id` or `episode_id`
/// does not resolve to an existing row, on a duplicate id, or if the
/// schedule fails [`check_schedule`].
pub fn insert_programs(conn: &Connection, rows: &[Program]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO program (
            id, title, description, start_at, end_at,
            thumbnail_url, channel_id, episode_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for row in rows {
        check_schedule(row)?;
        stmt.execute(rusqlite::params![
            row.id,
            row.title,
            row.description,
            encode(row.start_at),
            encode(row.end_at),
            row.thumbnail_url,
            row.channel_id,
            row.episode_id,
        ])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up a program by id, decoded against the reference date `on`.
/// Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails, or [`StoreError::Format`] if a
/// persisted schedule column is corrupted.
pub fn get_program(
    conn: &Connection,
    id: &str,
    on: NaiveDate,
) -> Result<Option<Program>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM program WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map([id], map_raw_row)?;
    rows.next().transpose()?.map(|raw| raw.decode(on)).transpose()
}

/// Loads a channel's programs in schedule order, decoded against `on`.
///
/// Orders by the persisted start time-of-day, then id, so the sequence
/// never depends on insertion order.
///
/// # Errors
///
/// Returns an error if the query fails, or [`StoreError::Format`] if a
/// persisted schedule column is corrupted.
pub fn list_programs_by_channel(
    conn: &Connection,
    channel_id: &str,
    on: NaiveDate,
) -> Result<Vec<Program>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM program
         WHERE channel_id = ?1
         ORDER BY start_at, id"
    ))?;
    let raws = stmt
        .query_map([channel_id], map_raw_row)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(|raw| raw.decode(on)).collect()
}

/// Projects the broadcasting channel of a program as a computed join.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn channel_of_program(
    conn: &Connection,
    program_id: &str,
) -> Result<Option<Channel>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.logo_url FROM channel c
         JOIN program p ON p.channel_id = c.id
         WHERE p.id = ?1",
    )?;
    let mut rows = stmt.query_map([program_id], map_channel_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Projects the broadcast episode of a program as a computed join.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn episode_of_program(
    conn: &Connection,
    program_id: &str,
) -> Result<Option<Episode>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT e.id FROM episode e
         JOIN program p ON p.episode_id = e.id
         WHERE p.id = ?1",
    )?;
    let mut rows = stmt.query_map([program_id], |row| row.get::<_, String>(0))?;
    match rows.next().transpose()? {
        Some(episode_id) => crate::episodes::get_episode(conn, &episode_id),
        None => Ok(None),
    }
}

/// Deletes a program. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_program(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM program WHERE id = ?1", [id])
        .map_err(Into::into)
}
