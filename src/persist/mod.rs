//! Raw contest sources and the key-value store abstraction.

pub mod json;
pub mod sqlite;

use thiserror::Error;

use crate::raw::RawContest;

/// Failures while loading or storing contest records.
#[derive(Debug, Error)]
pub enum PersistError {
    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Malformed JSON or envelope.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// File access failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Source-specific failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Anything that can hand over a fully materialized contest export.
pub trait ContestSource: Send {
    /// Loads the whole export.
    fn load_contests(&mut self) -> PersistResult<Vec<RawContest>>;
}

/// Contest records addressed by contest id.
pub trait KeyValueStore: Send {
    /// The record stored under `id`, if any.
    fn get(&self, id: &str) -> PersistResult<Option<RawContest>>;
    /// Inserts or overwrites the record under its id.
    fn put(&mut self, contest: &RawContest) -> PersistResult<()>;
    /// Every stored contest in first-insertion order.
    fn scan(&self) -> PersistResult<Vec<RawContest>>;
    /// Returns true when a record was removed.
    fn delete(&mut self, id: &str) -> PersistResult<bool>;
}

/// A fixed, already loaded export. Useful for tests and one-shot rebuilds.
impl ContestSource for Vec<RawContest> {
    fn load_contests(&mut self) -> PersistResult<Vec<RawContest>> {
        Ok(self.clone())
    }
}
