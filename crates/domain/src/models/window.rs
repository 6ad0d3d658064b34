//! Registration window model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::datetime::{offset_from_minutes, parse_instant};

/// Length applied when a window's close does not come after its open, and
/// when no close instant can be parsed at all.
pub const FALLBACK_WINDOW_DAYS: i64 = 3;

/// The open/close pair during which registration is permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationWindow {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    /// IANA zone id the window was defined in.
    pub timezone: String,
}

/// Position of an instant relative to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    BeforeOpen,
    Open,
    AfterClose,
}

impl RegistrationWindow {
    /// Enforces `closes_at > opens_at`, moving an invalid close to three days
    /// after the open.
    pub fn normalized(mut self) -> Self {
        if self.closes_at <= self.opens_at {
            self.closes_at = self.opens_at + Duration::days(FALLBACK_WINDOW_DAYS);
        }
        self
    }

    /// Classifies `now`. Both bounds are inclusive.
    pub fn status_at(&self, now: DateTime<Utc>) -> WindowStatus {
        if now < self.opens_at {
            WindowStatus::BeforeOpen
        } else if now > self.closes_at {
            WindowStatus::AfterClose
        } else {
            WindowStatus::Open
        }
    }

    /// Captures the window state for a single server-time reading.
    pub fn snapshot(&self, server_time: DateTime<Utc>) -> WindowSnapshot {
        let status = self.status_at(server_time);
        WindowSnapshot {
            opens_at: self.opens_at,
            closes_at: self.closes_at,
            timezone: self.timezone.clone(),
            open_timestamp: self.opens_at.timestamp_millis(),
            close_timestamp: self.closes_at.timestamp_millis(),
            server_time,
            server_timestamp: server_time.timestamp_millis(),
            is_open: status == WindowStatus::Open,
            is_before_open: status == WindowStatus::BeforeOpen,
            is_after_close: status == WindowStatus::AfterClose,
        }
    }
}

/// Window state as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WindowSnapshot {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub timezone: String,
    pub open_timestamp: i64,
    pub close_timestamp: i64,
    pub server_time: DateTime<Utc>,
    pub server_timestamp: i64,
    pub is_open: bool,
    pub is_before_open: bool,
    pub is_after_close: bool,
}

/// Configured fallback used to seed the store when no window row exists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WindowDefaults {
    pub opens_at: String,
    pub closes_at: String,
    pub timezone: String,
    /// Offset applied to naive datetimes, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl WindowDefaults {
    /// Resolves the configured bounds into a normalized window.
    ///
    /// An unparseable open falls back to `now`; an unparseable close falls
    /// back to `now + 3 days`.
    pub fn resolve(&self, now: DateTime<Utc>) -> RegistrationWindow {
        let offset = offset_from_minutes(self.utc_offset_minutes);
        let opens_at = parse_instant(&self.opens_at, offset).unwrap_or(now);
        let closes_at = parse_instant(&self.closes_at, offset)
            .unwrap_or_else(|| now + Duration::days(FALLBACK_WINDOW_DAYS));

        RegistrationWindow {
            opens_at,
            closes_at,
            timezone: self.timezone.clone(),
        }
        .normalized()
    }
}
