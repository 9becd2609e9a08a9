//! Normalization and the in-memory ranking index.

/// Immutable multi-index over normalized collections.
pub mod index;
/// Position index aliases.
pub mod indices;
/// Export-to-collections normalizer.
pub mod normalize;

pub use index::RankingIndex;
pub use normalize::normalize;
