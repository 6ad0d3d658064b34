//! Domain models for proctor registration.

pub mod capacity;
pub mod profile;
pub mod registration;
pub mod stats;
pub mod window;

pub use capacity::CapacityConfig;
pub use profile::{EmployeeProfile, LoginRequest, LoginSession};
pub use registration::{
    AdmissionReceipt, NewRegistration, Registration, RegistrationCandidate, RegistrationDetail,
};
pub use stats::{GroupCount, GroupField, RegistrationStats};
pub use window::{RegistrationWindow, WindowDefaults, WindowSnapshot, WindowStatus};
