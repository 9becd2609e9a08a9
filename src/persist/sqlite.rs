//! SQLite-backed contest store keyed by contest id.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::raw::RawContest;

use super::{ContestSource, KeyValueStore, PersistError, PersistResult};

/// Version number for serialized [`ContestEnvelope`] payloads.
pub const CONTEST_FORMAT_VERSION: u16 = 1;

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Wrapped contest.
    pub contest: RawContest,
}

impl ContestEnvelope {
    /// Constructs an envelope using [`CONTEST_FORMAT_VERSION`].
    pub fn new(contest: RawContest) -> Self {
        Self {
            format_version: CONTEST_FORMAT_VERSION,
            contest,
        }
    }
}

/// SQLite implementation of [`KeyValueStore`] and [`ContestSource`].
pub struct SqliteContestStore {
    conn: Connection,
}

impl SqliteContestStore {
    /// Opens or creates a store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Upserts every contest in one transaction, returning how many were written.
    pub fn put_all(&mut self, contests: &[RawContest]) -> PersistResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for contest in contests {
                let payload = encode_contest(contest)?;
                stmt.execute(params![contest.id, now_ms() as i64, payload])?;
            }
        }
        tx.commit()?;
        Ok(contests.len())
    }

    /// Number of stored contests.
    pub fn len(&self) -> PersistResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contests", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> PersistResult<bool> {
        Ok(self.len()? == 0)
    }
}

// New ids take the next sequence number; existing ids keep theirs so scan
// order stays the order contests were first written.
const UPSERT_SQL: &str = "INSERT INTO contests(id, seq, ts_ms, payload) \
     VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM contests), ?2, ?3) \
     ON CONFLICT(id) DO UPDATE SET ts_ms = excluded.ts_ms, payload = excluded.payload";

impl KeyValueStore for SqliteContestStore {
    fn get(&self, id: &str) -> PersistResult<Option<RawContest>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM contests WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        payload.map(|p| decode_contest(&p)).transpose()
    }

    fn put(&mut self, contest: &RawContest) -> PersistResult<()> {
        let payload = encode_contest(contest)?;
        self.conn
            .execute(UPSERT_SQL, params![contest.id, now_ms() as i64, payload])?;
        Ok(())
    }

    fn scan(&self) -> PersistResult<Vec<RawContest>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM contests ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, Vec<u8>>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(decode_contest(&row?)?);
        }
        Ok(out)
    }

    fn delete(&mut self, id: &str) -> PersistResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM contests WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

impl ContestSource for SqliteContestStore {
    fn load_contests(&mut self) -> PersistResult<Vec<RawContest>> {
        let contests = self.scan()?;
        info!(contests = contests.len(), "scanned contest store");
        Ok(contests)
    }
}

fn encode_contest(contest: &RawContest) -> PersistResult<Vec<u8>> {
    Ok(serde_json::to_vec(&ContestEnvelope::new(contest.clone()))?)
}

fn decode_contest(payload: &[u8]) -> PersistResult<RawContest> {
    let envelope: ContestEnvelope = serde_json::from_slice(payload)?;
    if envelope.format_version != CONTEST_FORMAT_VERSION {
        return Err(PersistError::Message(format!(
            "unsupported contest format version: {}",
            envelope.format_version
        )));
    }
    Ok(envelope.contest)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
