//! Schema version management using `PRAGMA user_version`.

use rusqlite::Connection;

use crate::error::StoreError;

/// Current schema version.
const CURRENT_VERSION: u32 = 3;

/// Runs database migrations up to `CURRENT_VERSION`.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < CURRENT_VERSION {
        tracing::debug!(from = version, to = CURRENT_VERSION, "running migrations");
    }

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }
    if version < 3 {
        migrate_v3(conn)?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)?;

    Ok(())
}

/// Migration to v1: catalog tables (stream, series, episode, channel,
/// program).
///
/// `program.start_at`/`end_at` hold time-of-day only (`HH:MM:SS`); the
/// date is re-derived at read time by the timecode module.
fn migrate_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stream (
            id               TEXT PRIMARY KEY,
            number_of_chunks INTEGER NOT NULL CHECK (number_of_chunks >= 0)
        );

        CREATE TABLE IF NOT EXISTS series (
            id            TEXT PRIMARY KEY,
            title         TEXT NOT NULL,
            description   TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS episode (
            id            TEXT PRIMARY KEY,
            title         TEXT NOT NULL,
            description   TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL,
            display_order INTEGER NOT NULL,
            series_id     TEXT NOT NULL REFERENCES series(id),
            stream_id     TEXT NOT NULL REFERENCES stream(id),
            premium       INTEGER NOT NULL CHECK (premium IN (0, 1))
        );

        CREATE TABLE IF NOT EXISTS channel (
            id       TEXT PRIMARY KEY,
            name     TEXT NOT NULL,
            logo_url TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS program (
            id            TEXT PRIMARY KEY,
            title         TEXT NOT NULL,
            description   TEXT NOT NULL,
            start_at      TEXT NOT NULL,
            end_at        TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL,
            channel_id    TEXT NOT NULL REFERENCES channel(id),
            episode_id    TEXT NOT NULL REFERENCES episode(id)
        );

        CREATE INDEX IF NOT EXISTS idx_episode_series_id ON episode(series_id);
        CREATE INDEX IF NOT EXISTS idx_program_channel_id ON program(channel_id);
        CREATE INDEX IF NOT EXISTS idx_program_start_at ON program(start_at);",
    )?;

    Ok(())
}

/// Migration to v2: recommendation tables.
///
/// `recommended_item` references exactly one of series/episode,
/// enforced by the CHECK constraint.
fn migrate_v2(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS recommended_module (
            id            TEXT PRIMARY KEY,
            display_order INTEGER NOT NULL,
            title         TEXT NOT NULL,
            reference_id  TEXT NOT NULL,
            type          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS recommended_item (
            id            TEXT PRIMARY KEY,
            display_order INTEGER NOT NULL,
            module_id     TEXT NOT NULL REFERENCES recommended_module(id),
            series_id     TEXT REFERENCES series(id),
            episode_id    TEXT REFERENCES episode(id),
            CHECK ((series_id IS NULL) <> (episode_id IS NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_recommended_item_module_id ON recommended_item(module_id);",
    )?;

    Ok(())
}

/// Migration to v3: user table with unique email.
fn migrate_v3(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id       INTEGER PRIMARY KEY,
            email    TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );",
    )?;

    Ok(())
}
