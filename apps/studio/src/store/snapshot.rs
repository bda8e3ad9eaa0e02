//! Durable snapshot storage: one named record holding the serialized model.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::errors::StudioError;
use crate::models::ResumeContent;

/// A single-key store for the resume snapshot.
///
/// `load` returns `Ok(None)` when no record exists yet.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<ResumeContent>, StudioError>;
    fn save(&self, content: &ResumeContent) -> Result<(), StudioError>;
}

/// Reads the persisted model, falling back to defaults when the record is
/// missing or unreadable. Never fails.
pub fn restore_or_default(store: &dyn SnapshotStore) -> ResumeContent {
    match store.load() {
        Ok(Some(content)) => {
            debug!("Restored resume snapshot from storage");
            content
        }
        Ok(None) => {
            debug!("No resume snapshot found, starting from defaults");
            ResumeContent::default()
        }
        Err(e) => {
            warn!("Discarding unreadable resume snapshot: {e}");
            ResumeContent::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File-backed store
// ────────────────────────────────────────────────────────────────────────────

/// Stores the snapshot as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the record, so a crash mid-write never leaves a truncated snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    key: String,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<ResumeContent>, StudioError> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, content: &ResumeContent) -> Result<(), StudioError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(content)?;
        write_atomically(&self.dir, &self.path(), &json)
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), StudioError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target)
        .map_err(|e| StudioError::Storage(format!("rename to {}: {}", target.display(), e.error)))?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the serialized snapshot in memory. Clones share the same record,
/// which lets a host (or a test) inspect what the store last wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    record: Arc<Mutex<Option<String>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the record with raw text, e.g. to simulate a corrupt snapshot.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.record.lock().ok().and_then(|r| r.clone())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<ResumeContent>, StudioError> {
        let guard = self
            .record
            .lock()
            .map_err(|_| StudioError::Storage("snapshot lock poisoned".to_string()))?;
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, content: &ResumeContent) -> Result<(), StudioError> {
        let json = serde_json::to_string(content)?;
        let mut guard = self
            .record
            .lock()
            .map_err(|_| StudioError::Storage("snapshot lock poisoned".to_string()))?;
        *guard = Some(json);
        Ok(())
    }
}
