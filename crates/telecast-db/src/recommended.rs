//! Recommendation modules and their items.

use rusqlite::Connection;

use crate::episodes::Episode;
use crate::error::StoreError;
use crate::series::{Series, map_series_row};

/// How a module's `reference_id` is interpreted by the consuming layer.
///
/// Closed tag set; anything else in the column is treated as corrupted
/// data on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
    /// Horizontal scroller of items.
    Carousel,
    /// Single featured item.
    Jumbotron,
}

impl ModuleType {
    /// The persisted tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Carousel => "carousel",
            Self::Jumbotron => "jumbotron",
        }
    }

    /// Parses a persisted tag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Format`] for an unknown tag.
    pub fn parse(tag: &str) -> Result<Self, StoreError> {
        match tag {
            "carousel" => Ok(Self::Carousel),
            "jumbotron" => Ok(Self::Jumbotron),
            _ => Err(StoreError::Format {
                value: tag.to_owned(),
                reason: "unknown module type",
            }),
        }
    }
}

/// A recommendation module (one shelf or banner on a page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendedModule {
    /// Module ID.
    pub id: String,
    /// Display sequence among the page's modules.
    pub order: i64,
    /// Module heading.
    pub title: String,
    /// What the module is attached to; interpreted per `module_type`.
    pub reference_id: String,
    /// How to render the module and read `reference_id`.
    pub module_type: ModuleType,
}

/// One entry inside a module; points at exactly one of a series or an
/// episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendedItem {
    /// Item ID.
    pub id: String,
    /// Display sequence within the module.
    pub order: i64,
    /// Owning module (FK → `recommended_module.id`).
    pub module_id: String,
    /// Recommended series, if this item points at a series.
    pub series_id: Option<String>,
    /// Recommended episode, if this item points at an episode.
    pub episode_id: Option<String>,
}

/// Column list shared by every module SELECT.
const MODULE_COLUMNS: &str = "id, display_order, title, reference_id, type";

/// A module row before its type tag is validated.
struct RawModule {
    id: String,
    order: i64,
    title: String,
    reference_id: String,
    module_type: String,
}

/// Maps a database row to a `RawModule`.
fn map_raw_module_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawModule> {
    Ok(RawModule {
        id: row.get(0)?,
        order: row.get(1)?,
        title: row.get(2)?,
        reference_id: row.get(3)?,
        module_type: row.get(4)?,
    })
}

impl RawModule {
    /// Validates the persisted type tag.
    fn decode(self) -> Result<RecommendedModule, StoreError> {
        Ok(RecommendedModule {
            module_type: ModuleType::parse(&self.module_type)?,
            id: self.id,
            order: self.order,
            title: self.title,
            reference_id: self.reference_id,
        })
    }
}

/// Maps a database row to a `RecommendedItem`.
fn map_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecommendedItem> {
    Ok(RecommendedItem {
        id: row.get(0)?,
        order: row.get(1)?,
        module_id: row.get(2)?,
        series_id: row.get(3)?,
        episode_id: row.get(4)?,
    })
}

/// Inserts modules; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] on a duplicate id.
pub fn insert_modules(conn: &Connection, rows: &[RecommendedModule]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO recommended_module (id, display_order, title, reference_id, type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for row in rows {
        stmt.execute(rusqlite::params![
            row.id,
            row.order,
            row.title,
            row.reference_id,
            row.module_type.as_str(),
        ])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Inserts items; all rows in one transaction, all-or-nothing.
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if `module_id` (or a non-null
/// `series_id`/`episode_id`) does not resolve, or if the item does not
/// reference exactly one of series/episode.
pub fn insert_items(conn: &Connection, rows: &[RecommendedItem]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO recommended_item (id, display_order, module_id, series_id, episode_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for row in rows {
        stmt.execute(rusqlite::params![
            row.id,
            row.order,
            row.module_id,
            row.series_id,
            row.episode_id,
        ])?;
    }

    drop(stmt);
    tx.commit()?;
    Ok(())
}

/// Looks up a module by id. Absence is `None`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails, or [`StoreError::Format`] for
/// an unknown persisted module tag.
pub fn get_module(conn: &Connection, id: &str) -> Result<Option<RecommendedModule>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MODULE_COLUMNS} FROM recommended_module WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map([id], map_raw_module_row)?;
    rows.next().transpose()?.map(RawModule::decode).transpose()
}

/// Loads all modules in display order.
///
/// # Errors
///
/// Returns an error if the query fails, or [`StoreError::Format`] for
/// an unknown persisted module tag.
pub fn list_modules(conn: &Connection) -> Result<Vec<RecommendedModule>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MODULE_COLUMNS} FROM recommended_module ORDER BY display_order, id"
    ))?;
    let raws = stmt
        .query_map([], map_raw_module_row)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(RawModule::decode).collect()
}

/// Loads the items of a module in display order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn items_of_module(
    conn: &Connection,
    module_id: &str,
) -> Result<Vec<RecommendedItem>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, display_order, module_id, series_id, episode_id
         FROM recommended_item
         WHERE module_id = ?1
         ORDER BY display_order, id",
    )?;
    let rows = stmt.query_map([module_id], map_item_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Projects the owning module of an item as a computed join.
///
/// # Errors
///
/// Returns an error if the query fails, or [`StoreError::Format`] for
/// an unknown persisted module tag.
pub fn module_of_item(
    conn: &Connection,
    item_id: &str,
) -> Result<Option<RecommendedModule>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.display_order, m.title, m.reference_id, m.type
         FROM recommended_module m
         JOIN recommended_item i ON i.module_id = m.id
         WHERE i.id = ?1",
    )?;
    let mut rows = stmt.query_map([item_id], map_raw_module_row)?;
    rows.next().transpose()?.map(RawModule::decode).transpose()
}

/// Projects the recommended series of an item, if it points at one.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn series_of_item(conn: &Connection, item_id: &str) -> Result<Option<Series>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.title, s.description, s.thumbnail_url FROM series s
         JOIN recommended_item i ON i.series_id = s.id
         WHERE i.id = ?1",
    )?;
    let mut rows = stmt.query_map([item_id], map_series_row)?;
    rows.next().transpose().map_err(Into::into)
}

/// Projects the recommended episode of an item, if it points at one.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn episode_of_item(conn: &Connection, item_id: &str) -> Result<Option<Episode>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT i.episode_id FROM recommended_item i WHERE i.id = ?1 AND i.episode_id IS NOT NULL",
    )?;
    let mut rows = stmt.query_map([item_id], |row| row.get::<_, String>(0))?;
    match rows.next().transpose()? {
        Some(episode_id) => crate::episodes::get_episode(conn, &episode_id),
        None => Ok(None),
    }
}

/// Deletes a module. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns [`StoreError::Integrity`] if any item still references the
/// module; dependents are never orphaned or cascaded.
pub fn delete_module(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM recommended_module WHERE id = ?1", [id])
        .map_err(Into::into)
}

/// Deletes an item. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_item(conn: &Connection, id: &str) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM recommended_item WHERE id = ?1", [id])
        .map_err(Into::into)
}
