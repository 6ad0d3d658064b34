//! Database row mappings.

pub mod registration;
pub mod window;

pub use registration::RegistrationEntity;
pub use window::WindowEntity;
