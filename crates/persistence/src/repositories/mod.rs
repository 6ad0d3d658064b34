//! PostgreSQL implementations of the domain storage contracts.

pub mod registration;
pub mod window;

pub use registration::RegistrationRepository;
pub use window::WindowRepository;

use domain::StoreError;

/// PostgreSQL unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a driver error onto the storage error taxonomy.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict(db_err.message().to_string());
        }
    }
    StoreError::Storage(err.to_string())
}
