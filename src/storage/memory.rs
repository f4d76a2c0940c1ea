use super::DocumentCollection;
use crate::core::{Result, TrackedPerson};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local collection. Each `put`/`delete` holds the write lock for the
/// whole operation, so writes to one id never interleave.
#[derive(Debug, Default)]
pub struct InMemoryCollection {
    records: RwLock<HashMap<Uuid, TrackedPerson>>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = TrackedPerson>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl DocumentCollection for InMemoryCollection {
    async fn get(&self, id: Uuid) -> Result<Option<TrackedPerson>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn put(&self, record: TrackedPerson) -> Result<()> {
        self.records.write().await.insert(record.id, record);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<TrackedPerson>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
