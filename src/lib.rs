// ============================================================================
// Dignitary Tracker Library
// ============================================================================

pub mod config;
pub mod core;
pub mod image;
pub mod projection;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod web;

// Re-export main types for convenience
pub use core::{
    Clock, ManualClock, PersonFields, PersonPatch, Result, Role, Status, SystemClock,
    TrackedPerson, TrackerError, ViewMode,
};
pub use projection::{project, status_priority};
pub use session::{Action, InlineDraft, SessionContext};
pub use storage::{BlobStore, DocumentCollection, InMemoryCollection, SnapshotCollection};
pub use store::RecordStore;
