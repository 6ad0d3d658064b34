//! Registration window storage and lazy seeding.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::models::{RegistrationWindow, WindowDefaults};

/// Storage for registration windows. Only the most recent row is active.
#[async_trait::async_trait]
pub trait WindowStore: Send + Sync {
    /// Most recently created window, if any.
    async fn latest(&self) -> Result<Option<RegistrationWindow>, StoreError>;

    /// Persists a window and returns it as stored.
    async fn insert(&self, window: RegistrationWindow) -> Result<RegistrationWindow, StoreError>;
}

/// In-process window store.
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    windows: RwLock<Vec<RegistrationWindow>>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `window`.
    pub fn with_window(window: RegistrationWindow) -> Self {
        Self {
            windows: RwLock::new(vec![window]),
        }
    }

    pub async fn len(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[async_trait::async_trait]
impl WindowStore for InMemoryWindowStore {
    async fn latest(&self) -> Result<Option<RegistrationWindow>, StoreError> {
        Ok(self.windows.read().await.last().cloned())
    }

    async fn insert(&self, window: RegistrationWindow) -> Result<RegistrationWindow, StoreError> {
        self.windows.write().await.push(window.clone());
        Ok(window)
    }
}

/// Resolves the active window, seeding the store from configuration on first
/// access.
///
/// Two concurrent first reads may both seed a row; the later one simply
/// becomes the latest.
#[derive(Clone)]
pub struct WindowService {
    store: Arc<dyn WindowStore>,
    defaults: Arc<WindowDefaults>,
}

impl WindowService {
    pub fn new(store: Arc<dyn WindowStore>, defaults: WindowDefaults) -> Self {
        Self {
            store,
            defaults: Arc::new(defaults),
        }
    }

    /// Current window, normalized.
    pub async fn current(&self, now: DateTime<Utc>) -> Result<RegistrationWindow, StoreError> {
        if let Some(window) = self.store.latest().await? {
            return Ok(window.normalized());
        }

        let window = self.defaults.resolve(now);
        tracing::info!(
            opens_at = %window.opens_at,
            closes_at = %window.closes_at,
            timezone = %window.timezone,
            "Seeding registration window from configuration"
        );
        self.store.insert(window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn defaults() -> WindowDefaults {
        WindowDefaults {
            opens_at: "2025-11-01 08:00:00".to_string(),
            closes_at: "2025-11-05 16:30:00".to_string(),
            timezone: "Asia/Bangkok".to_string(),
            utc_offset_minutes: 420,
        }
    }

    #[tokio::test]
    async fn test_seeds_once_from_defaults() {
        let store = Arc::new(InMemoryWindowStore::new());
        let service = WindowService::new(store.clone(), defaults());
        let now = Utc::now();

        let first = service.current(now).await.unwrap();
        let second = service.current(now).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);
        assert_eq!(
            first.opens_at,
            Utc.with_ymd_and_hms(2025, 11, 1, 1, 0, 0).unwrap()
        );
        assert_eq!(first.timezone, "Asia/Bangkok");
    }

    #[tokio::test]
    async fn test_existing_window_wins_over_defaults() {
        let open = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let stored = RegistrationWindow {
            opens_at: open,
            closes_at: open + Duration::days(1),
            timezone: "UTC".to_string(),
        };
        let store = Arc::new(InMemoryWindowStore::with_window(stored.clone()));
        let service = WindowService::new(store.clone(), defaults());

        assert_eq!(service.current(Utc::now()).await.unwrap(), stored);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_latest_row_is_active() {
        let open = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let store = InMemoryWindowStore::new();
        for days in [1, 2] {
            store
                .insert(RegistrationWindow {
                    opens_at: open,
                    closes_at: open + Duration::days(days),
                    timezone: "UTC".to_string(),
                })
                .await
                .unwrap();
        }
        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.closes_at, open + Duration::days(2));
    }

    #[tokio::test]
    async fn test_stored_invalid_window_is_normalized_on_read() {
        let open = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let store = Arc::new(InMemoryWindowStore::with_window(RegistrationWindow {
            opens_at: open,
            closes_at: open,
            timezone: "UTC".to_string(),
        }));
        let service = WindowService::new(store, defaults());

        let window = service.current(Utc::now()).await.unwrap();
        assert_eq!(window.closes_at, open + Duration::days(3));
    }
}
