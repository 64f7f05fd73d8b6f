//! Persistence seam for deck snapshots.

use crate::game::serialization::{DeckSnapshot, SnapshotError};
use core::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// External store that keeps the latest snapshot between sessions.
pub trait SnapshotStore {
    /// `None` when nothing is stored; `Some(Err(_))` when a stored document cannot be decoded.
    fn load(&self) -> Option<Result<DeckSnapshot, SnapshotError>>;

    fn save(&mut self, snapshot: &DeckSnapshot) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "failed to write snapshot {}: {source}", path.display())
            }
            StoreError::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Encode(err) => Some(err),
        }
    }
}

/// Keeps the snapshot in memory; useful for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Option<DeckSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<Result<DeckSnapshot, SnapshotError>> {
        self.slot.clone().map(Ok)
    }

    fn save(&mut self, snapshot: &DeckSnapshot) -> Result<(), StoreError> {
        self.slot = Some(snapshot.clone());
        Ok(())
    }
}

/// Stores the snapshot as pretty JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; a missing or unreadable file counts as nothing stored.
    pub fn load_raw(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Option<Result<DeckSnapshot, SnapshotError>> {
        self.load_raw().map(|text| DeckSnapshot::from_json(&text))
    }

    fn save(&mut self, snapshot: &DeckSnapshot) -> Result<(), StoreError> {
        let json = snapshot.to_json().map_err(StoreError::Encode)?;
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
