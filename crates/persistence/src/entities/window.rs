//! Registration window entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::RegistrationWindow;
use sqlx::FromRow;

/// Database row mapping for the registration_windows table.
#[derive(Debug, Clone, FromRow)]
pub struct WindowEntity {
    pub id: i64,
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl From<WindowEntity> for RegistrationWindow {
    fn from(entity: WindowEntity) -> Self {
        Self {
            opens_at: entity.opens_at,
            closes_at: entity.closes_at,
            timezone: entity.timezone,
        }
    }
}
