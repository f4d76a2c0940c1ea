pub mod clock;
pub mod error;
pub mod person;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TrackerError};
pub use person::{PersonFields, PersonPatch, TrackedPerson};
pub use types::{Role, Status, ViewMode};
