use std::{env, fmt::Display, str::FromStr, sync::Arc};

use thiserror::Error;
use tokio::{
    sync::{Mutex, broadcast, mpsc, oneshot, watch},
    time::{Duration, Instant, Interval, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::{
    core::index::RankingIndex,
    persist::{ContestSource, PersistError},
    raw::RawContest,
    types::Generation,
};

use super::events::IndexEvent;

/// Failures reported by [`RankingHandle`] commands.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Loading from the source failed.
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    /// A refresh was requested but no source is attached.
    #[error("no contest source configured")]
    NoSource,
    /// The blocking rebuild task panicked or was cancelled.
    #[error("rebuild task failed: {0}")]
    Join(String),
    /// The runtime loop has exited.
    #[error("runtime channel closed")]
    ChannelClosed,
}

/// Tuning for [`spawn_rankings`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Periodic reload interval; zero disables the timer.
    pub refresh_interval_ms: u64,
    /// Broadcast buffer for [`IndexEvent`]s.
    pub event_capacity: usize,
    /// Pending command queue length.
    pub command_bound: usize,
    /// Reload from the source once before serving the initial index.
    pub refresh_on_start: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 0,
            event_capacity: 1024,
            command_bound: 256,
            refresh_on_start: false,
        }
    }
}

impl RuntimeConfig {
    /// Reads `PODIUM_*` overrides, keeping the default for anything unset or invalid.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            refresh_interval_ms: env_or("PODIUM_REFRESH_INTERVAL_MS", defaults.refresh_interval_ms),
            event_capacity: env_or("PODIUM_EVENT_CAPACITY", defaults.event_capacity).max(1),
            command_bound: env_or("PODIUM_COMMAND_BOUND", defaults.command_bound).max(1),
            refresh_on_start: env_or("PODIUM_REFRESH_ON_START", defaults.refresh_on_start),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

/// A published index together with the generation it was published as.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    /// Publication counter, 0 for the initial index.
    pub generation: Generation,
    /// The published index.
    pub index: Arc<RankingIndex>,
}

/// Cloneable access to a running ranking runtime.
#[derive(Clone)]
pub struct RankingHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<IndexEvent>,
    snapshot_rx: watch::Receiver<IndexSnapshot>,
}

enum Command {
    Refresh {
        resp: oneshot::Sender<Result<Generation, RuntimeError>>,
    },
    Replace {
        raw: Vec<RawContest>,
        resp: oneshot::Sender<Result<Generation, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

type SharedSource = Arc<Mutex<Box<dyn ContestSource>>>;

struct Publisher {
    snapshot_tx: watch::Sender<IndexSnapshot>,
    events_tx: broadcast::Sender<IndexEvent>,
    generation: Generation,
}

impl Publisher {
    fn publish(&mut self, index: RankingIndex) -> Generation {
        self.generation += 1;
        let stats = index.stats();
        self.snapshot_tx.send_replace(IndexSnapshot {
            generation: self.generation,
            index: Arc::new(index),
        });
        info!(
            generation = self.generation,
            users = stats.users,
            contests = stats.contests,
            "published ranking index"
        );
        let _ = self.events_tx.send(IndexEvent::Published {
            generation: self.generation,
            stats,
        });
        self.generation
    }

    fn fail(&self, err: &RuntimeError) {
        warn!(generation = self.generation, "index rebuild failed: {err}");
        let _ = self.events_tx.send(IndexEvent::RefreshFailed {
            generation: self.generation,
            message: err.to_string(),
        });
    }
}

/// Starts the task that owns `source` and publishes rebuilt indices.
///
/// `initial` is published as generation 0. Readers only ever observe fully
/// built snapshots; a failed rebuild leaves the current one in place.
pub fn spawn_rankings(
    initial: RankingIndex,
    source: Option<Box<dyn ContestSource>>,
    config: RuntimeConfig,
) -> RankingHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_bound);
    let (events_tx, _) = broadcast::channel::<IndexEvent>(config.event_capacity);
    let (snapshot_tx, snapshot_rx) = watch::channel(IndexSnapshot {
        generation: 0,
        index: Arc::new(initial),
    });

    let mut publisher = Publisher {
        snapshot_tx,
        events_tx: events_tx.clone(),
        generation: 0,
    };
    let source: Option<SharedSource> = source.map(|s| Arc::new(Mutex::new(s)));

    tokio::spawn(async move {
        if config.refresh_on_start {
            let _ = rebuild_from_source(source.as_ref(), &mut publisher).await;
        }

        let mut ticker = (config.refresh_interval_ms > 0).then(|| {
            let period = Duration::from_millis(config.refresh_interval_ms);
            let mut t = tokio::time::interval_at(Instant::now() + period, period);
            t.set_missed_tick_behavior(MissedTickBehavior::Delay);
            t
        });

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if handle_command(cmd, source.as_ref(), &mut publisher).await {
                        break;
                    }
                }
                _ = next_tick(&mut ticker) => {
                    let _ = rebuild_from_source(source.as_ref(), &mut publisher).await;
                }
            }
        }
    });

    RankingHandle {
        cmd_tx,
        events_tx,
        snapshot_rx,
    }
}

impl RankingHandle {
    /// Receives events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.events_tx.subscribe()
    }

    /// A receiver that observes every publication.
    pub fn watch(&self) -> watch::Receiver<IndexSnapshot> {
        self.snapshot_rx.clone()
    }

    /// The latest published index. Holding it keeps that snapshot alive
    /// across later publications.
    pub fn current(&self) -> Arc<RankingIndex> {
        Arc::clone(&self.snapshot_rx.borrow().index)
    }

    /// The latest snapshot with its generation.
    pub fn snapshot(&self) -> IndexSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Generation of the latest snapshot.
    pub fn generation(&self) -> Generation {
        self.snapshot_rx.borrow().generation
    }

    /// Reloads the source, rebuilds and publishes.
    pub async fn refresh(&self) -> Result<Generation, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Refresh { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Builds and publishes an index from `raw` without touching the source.
    pub async fn replace(&self, raw: Vec<RawContest>) -> Result<Generation, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Replace { raw, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the loop. Published snapshots stay readable.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(
    cmd: Command,
    source: Option<&SharedSource>,
    publisher: &mut Publisher,
) -> bool {
    match cmd {
        Command::Refresh { resp } => {
            let res = rebuild_from_source(source, publisher).await;
            let _ = resp.send(res);
        }
        Command::Replace { raw, resp } => {
            let res = match tokio::task::spawn_blocking(move || RankingIndex::from_raw(&raw)).await {
                Ok(index) => Ok(publisher.publish(index)),
                Err(e) => {
                    let err = RuntimeError::Join(e.to_string());
                    publisher.fail(&err);
                    Err(err)
                }
            };
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

async fn rebuild_from_source(
    source: Option<&SharedSource>,
    publisher: &mut Publisher,
) -> Result<Generation, RuntimeError> {
    let Some(source) = source else {
        return Err(RuntimeError::NoSource);
    };

    let source_ref = Arc::clone(source);
    let built = tokio::task::spawn_blocking(move || {
        let mut source = source_ref.blocking_lock();
        let raw = source.load_contests()?;
        Result::<RankingIndex, PersistError>::Ok(RankingIndex::from_raw(&raw))
    })
    .await;

    let err = match built {
        Ok(Ok(index)) => return Ok(publisher.publish(index)),
        Ok(Err(err)) => RuntimeError::from(err),
        Err(e) => RuntimeError::Join(e.to_string()),
    };
    publisher.fail(&err);
    Err(err)
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
