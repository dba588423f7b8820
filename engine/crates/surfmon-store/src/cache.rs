//! File-backed snapshot store

use crate::entry::CacheEntry;
use chrono::Utc;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use surfmon_core::{Error, Result, Snapshot};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Ordered, persisted collection of snapshots bound to one file.
///
/// A store only exists in its loaded state: [`SnapshotStore::load`] is the only
/// constructor. Mutations stay in memory until [`SnapshotStore::save`].
/// Concurrent processes saving the same file race; the last save wins.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    /// Ascending by id
    entries: Vec<CacheEntry>,
}

impl SnapshotStore {
    /// Load the store at `path`. A missing file yields an empty store; a file that
    /// cannot be read or parsed is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No cache at {}, starting empty", path.display());
                return Ok(Self {
                    path,
                    entries: Vec::new(),
                });
            }
            Err(e) => return Err(corrupt(&path, e.to_string())),
        };

        let entries: Vec<CacheEntry> =
            serde_json::from_str(&content).map_err(|e| corrupt(&path, e.to_string()))?;

        if let Some(pair) = entries.windows(2).find(|w| w[0].id >= w[1].id) {
            return Err(corrupt(
                &path,
                format!("entry id {} follows id {}", pair[1].id, pair[0].id),
            ));
        }

        info!("Loaded {} cache entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    /// Backing file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, ascending by id
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id of the newest entry
    pub fn last_id(&self) -> Option<u64> {
        self.entries.last().map(|e| e.id)
    }

    /// Snapshot of the newest entry
    pub fn last_entry(&self) -> Option<&Snapshot> {
        self.entries.last().map(|e| &e.snapshot)
    }

    /// Snapshot of the entry with exactly this id
    pub fn entry(&self, id: u64) -> Option<&Snapshot> {
        self.entry_record(id).map(|e| &e.snapshot)
    }

    /// Full record of the entry with exactly this id
    pub fn entry_record(&self, id: u64) -> Option<&CacheEntry> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|pos| &self.entries[pos])
    }

    /// Append a snapshot stamped with the current time. Returns the assigned id.
    pub fn add_entry(&mut self, snapshot: Snapshot) -> Result<u64> {
        let id = match self.last_id() {
            None => 1,
            Some(last) => last.checked_add(1).ok_or_else(|| Error::IdsExhausted {
                path: self.path.display().to_string(),
            })?,
        };
        self.entries.push(CacheEntry::new(id, Utc::now(), snapshot));
        debug!("Added cache entry {}", id);
        Ok(id)
    }

    /// Keep only the `max_entries` newest entries. Returns how many were dropped.
    pub fn purge(&mut self, max_entries: usize) -> Result<usize> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig {
                key: "max_entries".into(),
                message: "at least one cache entry must be kept".into(),
            });
        }

        let excess = self.entries.len().saturating_sub(max_entries);
        if excess > 0 {
            self.entries.drain(..excess);
            debug!("Purged {} cache entries", excess);
        }
        Ok(excess)
    }

    /// Write all entries to the backing file, replacing it atomically
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        // Temp file in the same directory so the rename stays on one filesystem
        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, &self.entries)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn corrupt(path: &Path, message: String) -> Error {
    Error::CacheCorrupt {
        path: path.display().to_string(),
        message,
    }
}
