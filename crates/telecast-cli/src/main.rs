//! telecast - broadcast-schedule catalog CLI.

/// Application configuration (TOML).
mod config;
/// Seed-file model and loading.
mod seed;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{AppConfig, resolve_config_path};
use crate::seed::{SeedFile, load_seed};
use telecast_db::open_db;
use telecast_db::programs::list_programs_by_channel;
use telecast_db::series::{get_series, list_series};
use telecast_db::{channels, episodes};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Local database operations.
    Db(DbCommand),
}

/// Arguments for the `db` subcommand.
#[derive(clap::Args)]
struct DbCommand {
    /// Db subcommand to run.
    #[command(subcommand)]
    command: DbSubcommands,
}

/// Available database subcommands.
#[derive(Subcommand)]
enum DbSubcommands {
    /// Load a catalog seed file into the database.
    Seed(SeedArgs),
    /// Print a channel's schedule for a date.
    Schedule(ScheduleArgs),
    /// List series, or the episodes of one series.
    Series(SeriesArgs),
}

/// Arguments for the `db seed` subcommand.
#[derive(clap::Args)]
struct SeedArgs {
    /// Path to the JSON seed file.
    #[arg(long, required = true)]
    file: PathBuf,

    /// Reference date for program times (default: today).
    /// Format: "2024-05-01".
    #[arg(long)]
    date: Option<String>,
}

/// Arguments for the `db schedule` subcommand.
#[derive(clap::Args)]
struct ScheduleArgs {
    /// Channel ID. Falls back to the config default channel if omitted.
    #[arg(long)]
    channel: Option<String>,

    /// Reference date for program times (default: today).
    /// Format: "2024-05-01".
    #[arg(long)]
    date: Option<String>,
}

/// Arguments for the `db series` subcommand.
#[derive(clap::Args)]
struct SeriesArgs {
    /// Series ID; lists all series when omitted.
    #[arg(long)]
    id: Option<String>,
}

/// Parses `--date`, defaulting to today. This is the only place the
/// wall clock is consulted; everything below takes the date explicitly.
fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

/// Resolves the channel ID from CLI args or config fallback.
fn resolve_channel(channel: Option<String>, dir: Option<&PathBuf>) -> Result<String> {
    if let Some(ch) = channel {
        return Ok(ch);
    }

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    match config.schedule.channel {
        Some(ch) => {
            tracing::info!("Using channel {ch:?} from config");
            Ok(ch)
        }
        None => bail!("no channel specified: pass --channel or set schedule.channel in config"),
    }
}

/// Runs the `db seed` subcommand.
///
/// # Errors
///
/// Returns an error if the seed file cannot be read or parsed, or if
/// any batch fails to load.
#[instrument(skip_all)]
fn run_db_seed(args: &SeedArgs, dir: Option<&PathBuf>) -> Result<()> {
    let on = resolve_date(args.date.as_deref())?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let seed: SeedFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let conn = open_db(dir).context("failed to open database")?;
    let counts = load_seed(&conn, &seed, on).context("seed load failed")?;

    tracing::info!(
        streams = counts.streams,
        series = counts.series,
        episodes = counts.episodes,
        channels = counts.channels,
        programs = counts.programs,
        modules = counts.modules,
        items = counts.items,
        users = counts.users,
        "Seed load complete"
    );

    Ok(())
}

/// Runs the `db schedule` subcommand.
///
/// # Errors
///
/// Returns an error if no channel can be resolved or DB operations fail.
#[instrument(skip_all)]
fn run_db_schedule(args: &ScheduleArgs, dir: Option<&PathBuf>) -> Result<()> {
    let on = resolve_date(args.date.as_deref())?;
    let channel_id = resolve_channel(args.channel.clone(), dir)?;

    let conn = open_db(dir).context("failed to open database")?;

    let channel = channels::get_channel(&conn, &channel_id)
        .context("failed to load channel")?
        .with_context(|| format!("unknown channel {channel_id:?}"))?;

    let programs =
        list_programs_by_channel(&conn, &channel_id, on).context("failed to load programs")?;

    tracing::info!("Schedule for {} on {}", channel.name, on);
    tracing::info!("Start\t\t\tEnd\t\t\tTitle");
    for program in &programs {
        tracing::info!(
            "{}\t{}\t{}",
            program.start_at.format("%Y-%m-%d %H:%M:%S"),
            program.end_at.format("%Y-%m-%d %H:%M:%S"),
            program.title,
        );
    }
    tracing::info!("Total: {} programs", programs.len());

    Ok(())
}

/// Runs the `db series` subcommand.
///
/// # Errors
///
/// Returns an error if DB operations fail or the series is unknown.
#[instrument(skip_all)]
fn run_db_series(args: &SeriesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;

    if let Some(series_id) = &args.id {
        let series = get_series(&conn, series_id)
            .context("failed to load series")?
            .with_context(|| format!("unknown series {series_id:?}"))?;
        let list = episodes::list_episodes_by_series(&conn, series_id)
            .context("failed to load episodes")?;

        tracing::info!("{}: {} episode(s)", series.title, list.len());
        for episode in &list {
            tracing::info!(
                "  #{:<3} {} {}{}",
                episode.order,
                episode.id,
                episode.title,
                if episode.premium { " [premium]" } else { "" },
            );
        }
        return Ok(());
    }

    let all = list_series(&conn).context("failed to load series")?;
    tracing::info!("ID\tTitle");
    for series in &all {
        tracing::info!("{}\t{}", series.id, series.title);
    }
    tracing::info!("Total: {} series", all.len());

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Db(db) => match db.command {
            DbSubcommands::Seed(args) => run_db_seed(&args, cli.dir.as_ref()),
            DbSubcommands::Schedule(args) => run_db_schedule(&args, cli.dir.as_ref()),
            DbSubcommands::Series(args) => run_db_series(&args, cli.dir.as_ref()),
        },
    }
}
