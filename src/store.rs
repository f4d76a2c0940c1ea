//! Record store: the single source of truth for tracked dignitaries.
//!
//! The store validates input, assigns ids and stamps `last_updated`; the
//! [`DocumentCollection`] behind it only keeps documents. Role checks are the
//! caller's business.

use crate::core::{
    Clock, PersonFields, PersonPatch, Result, SystemClock, TrackedPerson, TrackerError,
};
use crate::storage::{DocumentCollection, InMemoryCollection};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct RecordStore {
    collection: Arc<dyn DocumentCollection>,
    clock: Arc<dyn Clock>,
    /// Serializes read-modify-write cycles so a merge never works on a stale copy.
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self::with_clock(collection, Arc::new(SystemClock))
    }

    pub fn with_clock(collection: Arc<dyn DocumentCollection>, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Empty process-local store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCollection::new()))
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub async fn create(&self, fields: PersonFields) -> Result<TrackedPerson> {
        let _guard = self.write_lock.lock().await;

        let id = self.fresh_id().await?;
        let record = TrackedPerson::from_fields(id, fields, self.clock.now()).inspect_err(|err| {
            debug!(error = %err, "rejected new record");
        })?;

        self.collection.put(record.clone()).await?;
        debug!(id = %record.id, name = %record.name, "record created");
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, patch: PersonPatch) -> Result<TrackedPerson> {
        let _guard = self.write_lock.lock().await;

        let current = self.collection.get(id).await?.ok_or_else(|| {
            warn!(%id, "update of unknown record");
            TrackerError::not_found(id)
        })?;

        let stamp = self.stamp_after(current.last_updated);
        let next = current.merged(patch, stamp)?;

        self.collection.put(next.clone()).await?;
        debug!(%id, status = %next.status, "record updated");
        Ok(next)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if !self.collection.delete(id).await? {
            warn!(%id, "delete of unknown record");
            return Err(TrackerError::not_found(id));
        }
        debug!(%id, "record deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<TrackedPerson> {
        self.collection
            .get(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(id))
    }

    /// Every record, in no particular order; ordering belongs to the projection.
    pub async fn list_all(&self) -> Result<Vec<TrackedPerson>> {
        self.collection.list().await
    }

    pub async fn len(&self) -> Result<usize> {
        self.collection.len().await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Loads ready-made records (ids and stamps included), replacing any record
    /// stored under the same id.
    pub async fn seed(&self, records: impl IntoIterator<Item = TrackedPerson>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut count = 0;
        for record in records {
            self.collection.put(record).await?;
            count += 1;
        }
        debug!(count, "store seeded");
        Ok(count)
    }

    async fn fresh_id(&self) -> Result<Uuid> {
        loop {
            let id = Uuid::new_v4();
            if self.collection.get(id).await?.is_none() {
                return Ok(id);
            }
        }
    }

    fn stamp_after(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        self.clock.now().max(previous)
    }
}
