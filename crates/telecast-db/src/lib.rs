//! Broadcast-schedule catalog store.
//!
//! Uses `rusqlite` (bundled `SQLite`) with enforced foreign keys for
//! the series/episode/channel/program catalog. Program schedule times
//! persist as time-of-day text and are re-anchored to a reference date
//! by the [`timecode`] module on every read.

/// Channel CRUD operations.
pub mod channels;
mod connection;
/// Episode CRUD operations and relationship projections.
pub mod episodes;
mod error;
mod migrations;
/// Program CRUD operations and schedule decoding.
pub mod programs;
/// Recommendation module/item CRUD operations.
pub mod recommended;
/// Series CRUD operations.
pub mod series;
/// Stream CRUD operations.
pub mod streams;
/// Time-of-day codec with midnight-rollover semantics.
pub mod timecode;
/// User CRUD operations.
pub mod users;

pub use connection::{open_db, open_in_memory};
pub use error::StoreError;
pub use rusqlite::Connection;
