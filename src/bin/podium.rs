use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use podium::{
    core::RankingIndex,
    persist::{ContestSource, json::JsonFileSource, sqlite::SqliteContestStore},
    runtime::{
        events::IndexEvent,
        handle::{RuntimeConfig, spawn_rankings},
    },
    types::DEFAULT_LEADERBOARD_LIMIT,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "podium")]
#[command(about = "Query rankings built from a contest export", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON export file.
    #[arg(long, env = "PODIUM_DATA")]
    data: Option<PathBuf>,

    /// SQLite contest store.
    #[arg(long, env = "PODIUM_DB")]
    db: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),
    /// Upsert every contest of a JSON export into the `--db` store.
    Import {
        file: PathBuf,
    },
    /// Keep rebuilding from the source and log each publication.
    Watch,
}

#[derive(Subcommand)]
enum QueryCommand {
    Leaderboard {
        #[arg(long, default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
        limit: usize,
    },
    User {
        id: String,
    },
    UserContests {
        id: String,
    },
    Contest {
        id: String,
    },
    ContestResults {
        id: String,
    },
    SearchUsers {
        #[arg(default_value = "")]
        pattern: String,
    },
    SearchContests {
        #[arg(default_value = "")]
        pattern: String,
    },
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("podium={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Commands::Import { file } => import(&cli, file),
        Commands::Watch => watch(&cli).await,
        Commands::Query(query) => {
            let mut source = open_source(&cli)?;
            let raw = source.load_contests().context("loading contests")?;
            let index = RankingIndex::from_raw(&raw);
            run_query(&index, query)
        }
    }
}

fn open_source(cli: &Cli) -> Result<Box<dyn ContestSource>> {
    match (&cli.data, &cli.db) {
        (Some(path), _) => Ok(Box::new(JsonFileSource::new(path))),
        (None, Some(path)) => Ok(Box::new(
            SqliteContestStore::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        (None, None) => bail!("either --data or --db is required"),
    }
}

fn run_query(index: &RankingIndex, command: &QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Leaderboard { limit } => print_json(&index.leaderboard(*limit)),
        QueryCommand::User { id } => print_json(&index.user_with_results(id)),
        QueryCommand::UserContests { id } => print_json(&index.user_contests(id)),
        QueryCommand::Contest { id } => print_json(&index.contest_with_participants(id)),
        QueryCommand::ContestResults { id } => print_json(&index.contest_results(id)),
        QueryCommand::SearchUsers { pattern } => print_json(&index.search_users(pattern)),
        QueryCommand::SearchContests { pattern } => print_json(&index.search_contests(pattern)),
        QueryCommand::Stats => print_json(&index.stats()),
    }
}

fn import(cli: &Cli, file: &Path) -> Result<()> {
    let Some(db) = &cli.db else {
        bail!("import needs --db");
    };
    let raw = JsonFileSource::new(file)
        .load_contests()
        .with_context(|| format!("reading {}", file.display()))?;
    let mut store =
        SqliteContestStore::open(db).with_context(|| format!("opening {}", db.display()))?;
    let written = store.put_all(&raw)?;
    tracing::info!("Imported {written} contests into {}", db.display());
    Ok(())
}

async fn watch(cli: &Cli) -> Result<()> {
    let source = open_source(cli)?;
    let config = RuntimeConfig {
        refresh_on_start: false,
        ..RuntimeConfig::from_env()
    };
    let handle = spawn_rankings(RankingIndex::new(), Some(source), config);
    // Subscribe before the first load so its event is logged below.
    let mut events = handle.subscribe();
    let _ = handle.refresh().await;

    loop {
        tokio::select! {
            evt = events.recv() => {
                match evt {
                    Ok(IndexEvent::Published { generation, stats }) => {
                        tracing::info!(
                            "Generation {generation}: {} users, {} contests",
                            stats.users,
                            stats.contests
                        );
                    }
                    Ok(IndexEvent::RefreshFailed { generation, message }) => {
                        tracing::warn!("Still serving generation {generation}: {message}");
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
