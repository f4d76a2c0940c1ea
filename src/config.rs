use crate::image::PortraitSink;
use crate::seed::sample_dignitaries;
use crate::storage::{DocumentCollection, InMemoryBlobStore, InMemoryCollection, SnapshotCollection};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::Utc;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Snapshot,
}

impl StorageBackend {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "memory" | "mem" | "in-memory" => Ok(Self::Memory),
            "snapshot" | "file" => Ok(Self::Snapshot),
            _ => Err(anyhow::anyhow!(
                "TRACKER_STORAGE must be one of: memory, snapshot"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortraitMode {
    Inline,
    Blob,
}

impl PortraitMode {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "inline" | "data-url" => Ok(Self::Inline),
            "blob" => Ok(Self::Blob),
            _ => Err(anyhow::anyhow!("TRACKER_PORTRAITS must be one of: inline, blob")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub snapshot_path: PathBuf,
    pub seed: bool,
    pub portraits: PortraitMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("APP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let storage =
            StorageBackend::from_env(&lookup("TRACKER_STORAGE").unwrap_or_else(|| "memory".to_string()))?;

        let snapshot_path = lookup("TRACKER_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/dignitaries.snapshot"));

        let seed = parse_bool(&lookup("TRACKER_SEED").unwrap_or_else(|| "true".to_string()))
            .context("TRACKER_SEED must be true or false")?;

        let portraits =
            PortraitMode::from_env(&lookup("TRACKER_PORTRAITS").unwrap_or_else(|| "inline".to_string()))?;

        // Blob bytes live in process memory; a snapshot would outlive them.
        if storage == StorageBackend::Snapshot && portraits == PortraitMode::Blob {
            return Err(anyhow::anyhow!(
                "TRACKER_PORTRAITS=blob cannot be combined with TRACKER_STORAGE=snapshot; use inline portraits"
            ));
        }

        Ok(Self {
            host,
            port,
            storage,
            snapshot_path,
            seed,
            portraits,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Opens the configured collection and seeds it when enabled and empty.
    pub async fn build_store(&self) -> Result<RecordStore> {
        let collection: Arc<dyn DocumentCollection> = match self.storage {
            StorageBackend::Memory => {
                info!("storage backend: memory");
                Arc::new(InMemoryCollection::new())
            }
            StorageBackend::Snapshot => {
                info!(path = %self.snapshot_path.display(), "storage backend: snapshot");
                Arc::new(
                    SnapshotCollection::open(&self.snapshot_path)
                        .context("failed to open tracker snapshot")?,
                )
            }
        };

        let store = RecordStore::new(collection);
        if self.seed && store.is_empty().await? {
            let seeded = store.seed(sample_dignitaries(Utc::now())?).await?;
            info!(records = seeded, "seeded sample dignitaries");
        }
        Ok(store)
    }

    pub fn portrait_sink(&self) -> PortraitSink {
        match self.portraits {
            PortraitMode::Inline => PortraitSink::Inline,
            PortraitMode::Blob => PortraitSink::Blob(Arc::new(InMemoryBlobStore::new())),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("not a boolean: '{other}'")),
    }
}
