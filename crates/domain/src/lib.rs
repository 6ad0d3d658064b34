//! Domain layer for the proctor registration service.
//!
//! Holds the registration models, the classification heuristics, the storage
//! contracts and the admission gate that guards writes to the ledger.

pub mod errors;
pub mod models;
pub mod services;

pub use errors::{AdmissionError, StoreError};
