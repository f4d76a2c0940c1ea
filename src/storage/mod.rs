pub mod blob;
pub mod engine;
pub mod memory;
pub mod persistence;

pub use blob::{BlobRef, BlobStore, InMemoryBlobStore};
pub use engine::DocumentCollection;
pub use memory::InMemoryCollection;
pub use persistence::{CollectionSnapshot, SnapshotCollection, SnapshotFile};
