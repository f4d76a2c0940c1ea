use crate::core::{Result, TrackedPerson};
use async_trait::async_trait;
use uuid::Uuid;

/// Document collection backing the record store - allows pluggable backends.
///
/// The store treats the collection as the authority: it never caches records
/// between calls.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Fetch a single record by id
    async fn get(&self, id: Uuid) -> Result<Option<TrackedPerson>>;

    /// Insert or replace a record, keyed by its id
    async fn put(&self, record: TrackedPerson) -> Result<()>;

    /// Remove a record. Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// All stored records, in no particular order
    async fn list(&self) -> Result<Vec<TrackedPerson>>;

    /// Number of stored records
    async fn len(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}
