//! Runtime event stream payloads.

use crate::{types::Generation, view::IndexStats};

/// Events emitted from the refresh runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// A fully built index snapshot became current.
    Published {
        /// Generation of the new snapshot.
        generation: Generation,
        /// Row counts of the new snapshot.
        stats: IndexStats,
    },
    /// A rebuild failed; the previous snapshot stays current.
    RefreshFailed {
        /// Generation that remains current.
        generation: Generation,
        /// Rendered error.
        message: String,
    },
}
