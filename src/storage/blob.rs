use crate::core::{Result, TrackerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;
use uuid::Uuid;

const BLOB_SCHEME: &str = "blob:";

/// Opaque reference to stored image bytes, rendered as `blob:<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobRef(Uuid);

impl BlobRef {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }

    /// Whether `reference` names a blob rather than an inline data URL.
    pub fn is_blob_reference(reference: &str) -> bool {
        reference.starts_with(BLOB_SCHEME)
    }
}

impl Default for BlobRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", BLOB_SCHEME, self.0)
    }
}

impl FromStr for BlobRef {
    type Err = TrackerError;

    fn from_str(raw: &str) -> Result<Self> {
        let id = raw.strip_prefix(BLOB_SCHEME).unwrap_or(raw);
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| TrackerError::validation(format!("invalid blob reference '{raw}'")))
    }
}

impl TryFrom<String> for BlobRef {
    type Error = TrackerError;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

impl From<BlobRef> for String {
    fn from(reference: BlobRef) -> Self {
        reference.to_string()
    }
}

/// Storage for portrait bytes. The tracker only keeps the returned reference.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, bytes: Vec<u8>) -> Result<BlobRef>;

    async fn fetch(&self, reference: BlobRef) -> Result<Vec<u8>>;
}

#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobRef, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, bytes: Vec<u8>) -> Result<BlobRef> {
        let reference = BlobRef::new();
        self.blobs.write().await.insert(reference, bytes);
        Ok(reference)
    }

    async fn fetch(&self, reference: BlobRef) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(&reference)
            .cloned()
            .ok_or_else(|| TrackerError::not_found(reference))
    }
}
