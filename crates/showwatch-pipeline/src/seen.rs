//! Record of matches that have already been notified.
//!
//! Without a store every run re-reports an unchanged listing. With one,
//! matches are keyed by artist and show id, and a key is recorded only after
//! its report was delivered.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use showwatch_core::MatchResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeenStoreError {
    #[error("failed to access seen-store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("seen-store {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent set of already-notified match keys.
pub trait NotifiedStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SeenStoreError`] if the store cannot be read.
    fn load(&self) -> Result<BTreeSet<String>, SeenStoreError>;

    /// Add `keys` to the store.
    ///
    /// # Errors
    ///
    /// Returns [`SeenStoreError`] if the store cannot be written.
    fn record(&self, keys: &[String]) -> Result<(), SeenStoreError>;
}

/// Dedup key for a match: the artist and the show id, tab-separated.
///
/// Shows without an id fall back to their display name.
#[must_use]
pub fn match_key(m: &MatchResult) -> String {
    let show = m
        .show
        .id
        .as_deref()
        .unwrap_or_else(|| m.show.display_name());
    format!("{}\t{show}", m.artist)
}

/// [`NotifiedStore`] backed by a JSON array on disk.
///
/// A missing file reads as empty. Writes go to a uniquely named temp file in
/// the same directory that is then persisted over the existing file. Calls
/// block; async callers run them on the blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SeenStoreError {
        SeenStoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl NotifiedStore for JsonFileStore {
    fn load(&self) -> Result<BTreeSet<String>, SeenStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&content).map_err(|e| SeenStoreError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    fn record(&self, keys: &[String]) -> Result<(), SeenStoreError> {
        let mut seen = self.load()?;
        seen.extend(keys.iter().cloned());

        let json = serde_json::to_string_pretty(&seen).map_err(|e| SeenStoreError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}
