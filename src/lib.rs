//! In-memory relational projection of contest exports: normalized users,
//! contests, results and participants with bidirectional lookups, career
//! aggregates and leaderboards.
//!
//! # Examples
//!
//! Building an index directly from an export:
//! ```
//! use podium::{
//!     core::RankingIndex,
//!     raw::{RawContest, RawParticipation},
//! };
//!
//! let contest = RawContest {
//!     id: "c1".to_string(),
//!     name: "Spring Open".to_string(),
//!     discipline: "boulder".to_string(),
//!     date: "2024-04-01".to_string(),
//!     country: "FR".to_string(),
//!     city: "Lyon".to_string(),
//!     prize: "500".to_string(),
//!     gender: "F".to_string(),
//!     category: "senior".to_string(),
//!     athletes: vec![RawParticipation {
//!         athlete_id: "alice".to_string(),
//!         name: "Alice".to_string(),
//!         place: "1".to_string(),
//!         points: 100,
//!     }],
//! };
//!
//! let index = RankingIndex::from_raw(&[contest]);
//! let board = index.leaderboard(podium::types::DEFAULT_LEADERBOARD_LIMIT);
//! assert_eq!(board[0].total_points, 100);
//! assert!(index.user_with_results("nobody").is_none());
//! ```
//!
//! Serving snapshots that a runtime rebuilds from a SQLite store:
//! ```no_run
//! use podium::{
//!     core::RankingIndex,
//!     persist::sqlite::SqliteContestStore,
//!     runtime::handle::{spawn_rankings, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqliteContestStore::open("contests.db").expect("open sqlite");
//! let cfg = RuntimeConfig { refresh_interval_ms: 60_000, ..RuntimeConfig::default() };
//! let handle = spawn_rankings(RankingIndex::new(), Some(Box::new(store)), cfg);
//! handle.refresh().await.expect("refresh");
//! let index = handle.current();
//! println!("{} users", index.stats().users);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![warn(missing_docs)]

/// Normalizer and ranking index.
pub mod core;
/// Contest sources and persistence.
pub mod persist;
/// Denormalized export records.
pub mod raw;
/// Normalized entity rows.
pub mod record;
/// Refresh runtime handle and events.
pub mod runtime;
/// Shared identifiers and constants.
pub mod types;
/// Query result views.
pub mod view;
