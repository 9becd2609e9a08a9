//! Static JSON export file source.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{info, warn};

use crate::raw::{RawContest, objects_as};

use super::{ContestSource, PersistResult};

/// Reads a JSON array of contests from a file on every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The export file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContestSource for JsonFileSource {
    fn load_contests(&mut self) -> PersistResult<Vec<RawContest>> {
        let file = File::open(&self.path)?;
        let contests = read_contests(BufReader::new(file))?;
        info!(path = %self.path.display(), contests = contests.len(), "loaded contest export");
        Ok(contests)
    }
}

/// Decodes a JSON array of contests. A `null` document counts as empty and
/// entries that are not objects are skipped.
pub fn read_contests(reader: impl Read) -> PersistResult<Vec<RawContest>> {
    let entries: Option<Vec<Value>> = serde_json::from_reader(reader)?;
    let entries = entries.unwrap_or_default();
    let total = entries.len();
    let contests: Vec<RawContest> = objects_as(entries);
    if contests.len() < total {
        warn!(skipped = total - contests.len(), "skipped non-object contest entries");
    }
    Ok(contests)
}
