//! Domain services: classification, payload handling, storage contracts and
//! the admission gate.

pub mod admission;
pub mod classification;
pub mod ledger;
pub mod payload;
pub mod queue;
pub mod window_store;

pub use admission::{AdmissionGate, AdmissionPolicy};
pub use classification::{Gender, RoleMarkers, UserRole};
pub use ledger::{InMemoryLedger, RegistrationLedger};
pub use payload::Payload;
pub use queue::QueueRanker;
pub use window_store::{InMemoryWindowStore, WindowService, WindowStore};
