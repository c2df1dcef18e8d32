//! Catalog seed-file model and loading.
//!
//! The seed file is the camelCase JSON export of the upstream catalog.
//! Program times arrive in their `HH:MM:SS` wire form and are decoded
//! against the seeding reference date before they cross the store
//! boundary.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use telecast_db::Connection;
use telecast_db::channels::{Channel, insert_channels};
use telecast_db::episodes::{Episode, insert_episodes};
use telecast_db::programs::{Program, insert_programs};
use telecast_db::recommended::{
    ModuleType, RecommendedItem, RecommendedModule, insert_items, insert_modules,
};
use telecast_db::series::{Series, insert_series};
use telecast_db::streams::{Stream, insert_streams};
use telecast_db::timecode::{decode_end, decode_start};
use telecast_db::users::{User, insert_users};

/// Top-level seed file.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedFile {
    /// Stream rows.
    #[serde(default)]
    pub streams: Vec<SeedStream>,
    /// Series rows.
    #[serde(default)]
    pub series: Vec<SeedSeries>,
    /// Episode rows.
    #[serde(default)]
    pub episodes: Vec<SeedEpisode>,
    /// Channel rows.
    #[serde(default)]
    pub channels: Vec<SeedChannel>,
    /// Program rows.
    #[serde(default)]
    pub programs: Vec<SeedProgram>,
    /// Recommendation modules.
    #[serde(default)]
    pub recommended_modules: Vec<SeedModule>,
    /// Recommendation items.
    #[serde(default)]
    pub recommended_items: Vec<SeedItem>,
    /// User rows.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

/// A stream in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedStream {
    /// Stream ID.
    pub id: String,
    /// Number of media chunks.
    pub number_of_chunks: u32,
}

/// A series in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedSeries {
    /// Series ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
}

/// An episode in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedEpisode {
    /// Episode ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Display sequence within the series.
    pub order: i64,
    /// Owning series.
    pub series_id: String,
    /// Backing stream.
    pub stream_id: String,
    /// Premium-only flag.
    pub premium: bool,
}

/// A channel in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedChannel {
    /// Channel ID.
    pub id: String,
    /// Channel display name.
    pub name: String,
    /// Channel logo image URL.
    pub logo_url: String,
}

/// A program in the seed file; times in `HH:MM:SS` wire form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedProgram {
    /// Program ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Broadcast start time-of-day.
    pub start_at: String,
    /// Broadcast end time-of-day; `00:00:00` means end-of-day midnight.
    pub end_at: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Broadcasting channel.
    pub channel_id: String,
    /// Broadcast episode.
    pub episode_id: String,
}

/// A recommendation module in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedModule {
    /// Module ID.
    pub id: String,
    /// Display sequence among modules.
    pub order: i64,
    /// Module heading.
    pub title: String,
    /// Reference the module is attached to.
    pub reference_id: String,
    /// Module type tag (`carousel` | `jumbotron`).
    #[serde(rename = "type")]
    pub module_type: String,
}

/// A recommendation item in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedItem {
    /// Item ID.
    pub id: String,
    /// Display sequence within the module.
    pub order: i64,
    /// Owning module.
    pub module_id: String,
    /// Recommended series, if any.
    #[serde(default)]
    pub series_id: Option<String>,
    /// Recommended episode, if any.
    #[serde(default)]
    pub episode_id: Option<String>,
}

/// A user in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedUser {
    /// User ID.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Stored password value.
    pub password: String,
}

/// Per-entity row counts of a completed load.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedCounts {
    /// Streams inserted.
    pub streams: usize,
    /// Series inserted.
    pub series: usize,
    /// Episodes inserted.
    pub episodes: usize,
    /// Channels inserted.
    pub channels: usize,
    /// Programs inserted.
    pub programs: usize,
    /// Modules inserted.
    pub modules: usize,
    /// Items inserted.
    pub items: usize,
    /// Users inserted.
    pub users: usize,
}

/// Loads a parsed seed file into the store in dependency order, one
/// transaction per entity batch.
///
/// # Errors
///
/// Returns an error if a time-of-day or module tag fails to decode, or
/// if any batch violates referential integrity.
pub fn load_seed(conn: &Connection, seed: &SeedFile, on: NaiveDate) -> Result<SeedCounts> {
    let streams: Vec<Stream> = seed
        .streams
        .iter()
        .map(|s| Stream {
            id: s.id.clone(),
            number_of_chunks: s.number_of_chunks,
        })
        .collect();
    insert_streams(conn, &streams).context("failed to insert streams")?;

    let series: Vec<Series> = seed
        .series
        .iter()
        .map(|s| Series {
            id: s.id.clone(),
            title: s.title.clone(),
            description: s.description.clone(),
            thumbnail_url: s.thumbnail_url.clone(),
        })
        .collect();
    insert_series(conn, &series).context("failed to insert series")?;

    let episodes: Vec<Episode> = seed
        .episodes
        .iter()
        .map(|e| Episode {
            id: e.id.clone(),
            title: e.title.clone(),
            description: e.description.clone(),
            thumbnail_url: e.thumbnail_url.clone(),
            order: e.order,
            series_id: e.series_id.clone(),
            stream_id: e.stream_id.clone(),
            premium: e.premium,
        })
        .collect();
    insert_episodes(conn, &episodes).context("failed to insert episodes")?;

    let channels: Vec<Channel> = seed
        .channels
        .iter()
        .map(|c| Channel {
            id: c.id.clone(),
            name: c.name.clone(),
            logo_url: c.logo_url.clone(),
        })
        .collect();
    insert_channels(conn, &channels).context("failed to insert channels")?;

    let programs: Vec<Program> = seed
        .programs
        .iter()
        .map(|p| {
            Ok(Program {
                id: p.id.clone(),
                title: p.title.clone(),
                description: p.description.clone(),
                start_at: decode_start(&p.start_at, on)?,
                end_at: decode_end(&p.end_at, on)?,
                thumbnail_url: p.thumbnail_url.clone(),
                channel_id: p.channel_id.clone(),
                episode_id: p.episode_id.clone(),
            })
        })
        .collect::<Result<Vec<_>, telecast_db::StoreError>>()
        .context("failed to decode program schedule")?;
    insert_programs(conn, &programs).context("failed to insert programs")?;

    let modules: Vec<RecommendedModule> = seed
        .recommended_modules
        .iter()
        .map(|m| {
            Ok(RecommendedModule {
                id: m.id.clone(),
                order: m.order,
                title: m.title.clone(),
                reference_id: m.reference_id.clone(),
                module_type: ModuleType::parse(&m.module_type)?,
            })
        })
        .collect::<Result<Vec<_>, telecast_db::StoreError>>()
        .context("failed to decode module types")?;
    insert_modules(conn, &modules).context("failed to insert recommended modules")?;

    let items: Vec<RecommendedItem> = seed
        .recommended_items
        .iter()
        .map(|i| RecommendedItem {
            id: i.id.clone(),
            order: i.order,
            module_id: i.module_id.clone(),
            series_id: i.series_id.clone(),
            episode_id: i.episode_id.clone(),
        })
        .collect();
    insert_items(conn, &items).context("failed to insert recommended items")?;

    let users: Vec<User> = seed
        .users
        .iter()
        .map(|u| User {
            id: u.id,
            email: u.email.clone(),
            password: u.password.clone(),
        })
        .collect();
    insert_users(conn, &users).context("failed to insert users")?;

    Ok(SeedCounts {
        streams: streams.len(),
        series: series.len(),
        episodes: episodes.len(),
        channels: channels.len(),
        programs: programs.len(),
        modules: modules.len(),
        items: items.len(),
        users: users.len(),
    })
}
