//! Snapshot-backed document collection.
//!
//! Records live in memory; every mutation rewrites a MessagePack snapshot of the
//! whole collection through a temp file and an atomic rename. Opening a
//! collection loads the last snapshot if one exists.

use super::DocumentCollection;
use crate::core::{Result, TrackedPerson, TrackerError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

const SNAPSHOT_VERSION: u32 = 1;

// ============================================================================
// Snapshot Format
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub records: Vec<TrackedPerson>,
}

impl CollectionSnapshot {
    pub fn new(records: Vec<TrackedPerson>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            records,
        }
    }
}

// ============================================================================
// Snapshot File
// ============================================================================

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, snapshot: &CollectionSnapshot) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| {
            TrackerError::storage(format!("Failed to create snapshot directory: {}", e))
        })?;

        let serialized = rmp_serde::to_vec_named(snapshot)
            .map_err(|e| TrackerError::storage(format!("Failed to serialize snapshot: {}", e)))?;

        let mut temp = NamedTempFile::new_in(&parent)
            .map_err(|e| TrackerError::storage(format!("Failed to create temp file: {}", e)))?;
        temp.write_all(&serialized)
            .map_err(|e| TrackerError::storage(format!("Failed to write snapshot: {}", e)))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| TrackerError::storage(format!("Failed to sync snapshot: {}", e)))?;
        temp.persist(&self.path)
            .map_err(|e| TrackerError::storage(format!("Failed to rename snapshot: {}", e)))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<CollectionSnapshot>> {
        if !self.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)
            .map_err(|e| TrackerError::storage(format!("Failed to read snapshot: {}", e)))?;
        let snapshot: CollectionSnapshot = rmp_serde::from_slice(&data).map_err(|e| {
            TrackerError::storage(format!("Failed to deserialize snapshot: {}", e))
        })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TrackerError::storage(format!(
                "Unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(Some(snapshot))
    }
}

// ============================================================================
// Snapshot Collection
// ============================================================================

pub struct SnapshotCollection {
    records: RwLock<HashMap<Uuid, TrackedPerson>>,
    file: SnapshotFile,
}

impl SnapshotCollection {
    /// Opens the collection at `path`, loading the existing snapshot if any.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = SnapshotFile::new(path);
        let records = match file.load()? {
            Some(snapshot) => {
                info!(
                    path = %file.path().display(),
                    records = snapshot.records.len(),
                    "loaded tracker snapshot"
                );
                snapshot
                    .records
                    .into_iter()
                    .map(|record| (record.id, record))
                    .collect()
            }
            None => HashMap::new(),
        };

        Ok(Self {
            records: RwLock::new(records),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn checkpoint(&self, records: &HashMap<Uuid, TrackedPerson>) -> Result<()> {
        let snapshot = CollectionSnapshot::new(records.values().cloned().collect());
        self.file.save(&snapshot)?;
        debug!(records = records.len(), "snapshot written");
        Ok(())
    }
}

#[async_trait]
impl DocumentCollection for SnapshotCollection {
    async fn get(&self, id: Uuid) -> Result<Option<TrackedPerson>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn put(&self, record: TrackedPerson) -> Result<()> {
        let mut records = self.records.write().await;
        let previous = records.insert(record.id, record.clone());
        if let Err(err) = self.checkpoint(&records) {
            // Keep memory and disk in agreement.
            match previous {
                Some(previous) => records.insert(record.id, previous),
                None => records.remove(&record.id),
            };
            return Err(err);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let Some(removed) = records.remove(&id) else {
            return Ok(false);
        };
        if let Err(err) = self.checkpoint(&records) {
            records.insert(id, removed);
            return Err(err);
        }
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<TrackedPerson>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
