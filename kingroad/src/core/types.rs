//! Route records and the small enums shared by the store and its adapters.
//!
//! Field names and enum spellings are part of the persisted history format
//! (`kingroad_route_history`) and must stay stable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin label used when the caller does not name one.
pub const CURRENT_LOCATION: &str = "Current location";

/// Unique, strictly increasing route identifier (epoch milliseconds at creation,
/// bumped past the previous id on collision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub u64);

impl RouteId {
    /// Next id for a route created at `now_millis`, never reusing or going below `last`.
    pub fn next(now_millis: i64, last: Option<RouteId>) -> RouteId {
        let candidate = u64::try_from(now_millis).unwrap_or(0);
        match last {
            Some(RouteId(prev)) if candidate <= prev => RouteId(prev.saturating_add(1)),
            _ => RouteId(candidate),
        }
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a route attempt.
///
/// Only `Active -> Canceled` is ever produced; `Completed` is representable so
/// histories written by other clients still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Active,
    Canceled,
    Completed,
}

impl RouteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteStatus::Active => "active",
            RouteStatus::Canceled => "canceled",
            RouteStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RouteStatus::Active => "Active",
            RouteStatus::Canceled => "Canceled",
            RouteStatus::Completed => "Completed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            RouteStatus::Active => "🟢",
            RouteStatus::Canceled => "⚡",
            RouteStatus::Completed => "✅",
        }
    }
}

/// One navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteId,
    pub destination: String,
    pub origin: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Elapsed milliseconds between start and end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(rename = "distance")]
    pub distance_km: u32,
    #[serde(rename = "estimatedTime")]
    pub eta_minutes: u32,
    pub status: RouteStatus,
}

impl Route {
    pub fn is_active(&self) -> bool {
        self.status == RouteStatus::Active
    }

    /// Flip an active route to `Canceled`, stamping end time and duration.
    ///
    /// `end_time` is clamped to `start_time` so a clock stepping backwards never
    /// yields a negative duration.
    pub fn cancel_at(&mut self, now: DateTime<Utc>) {
        let end = now.max(self.start_time);
        let elapsed = (end - self.start_time).num_milliseconds();
        self.end_time = Some(end);
        self.duration = Some(u64::try_from(elapsed).unwrap_or(0));
        self.status = RouteStatus::Canceled;
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

/// Fixed catalogue offered by the quick-destinations picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum QuickDestination {
    Home,
    Work,
    GasStation,
    Restaurant,
    Hospital,
    Supermarket,
}

impl QuickDestination {
    pub const ALL: [QuickDestination; 6] = [
        QuickDestination::Home,
        QuickDestination::Work,
        QuickDestination::GasStation,
        QuickDestination::Restaurant,
        QuickDestination::Hospital,
        QuickDestination::Supermarket,
    ];

    /// Destination text used for the created route.
    pub fn label(self) -> &'static str {
        match self {
            QuickDestination::Home => "🏠 Home",
            QuickDestination::Work => "🏢 Work",
            QuickDestination::GasStation => "⛽ Nearest gas station",
            QuickDestination::Restaurant => "🍕 Restaurant",
            QuickDestination::Hospital => "🏥 Hospital",
            QuickDestination::Supermarket => "🛒 Supermarket",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            QuickDestination::Home => "home",
            QuickDestination::Work => "work",
            QuickDestination::GasStation => "gas_station",
            QuickDestination::Restaurant => "restaurant",
            QuickDestination::Hospital => "hospital",
            QuickDestination::Supermarket => "supermarket",
        }
    }
}

/// Read-only view handed to rendering hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub current: Option<Route>,
    /// Most recent first.
    pub recent: Vec<Route>,
}
