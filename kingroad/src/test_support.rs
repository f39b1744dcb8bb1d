//! Test-only helpers: deterministic clock, recording notifier, failing
//! storage and a ready-made store harness.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use chrono::{DateTime, TimeZone, Utc};

use crate::core::estimate::FixedEstimator;
use crate::core::types::{CURRENT_LOCATION, NotificationKind, Route, RouteId, RouteStatus};
use crate::io::clock::Clock;
use crate::io::notify::Notifier;
use crate::io::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::store::{RouteStore, StoreOptions};

/// 2025-01-01T12:00:00Z, the instant every harness clock starts at.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .expect("valid base time")
}

/// Create a deterministic route with explicit id and status.
pub fn route(id: u64, destination: &str, status: RouteStatus) -> Route {
    Route {
        id: RouteId(id),
        destination: destination.to_string(),
        origin: CURRENT_LOCATION.to_string(),
        start_time: base_time(),
        end_time: None,
        duration: None,
        distance_km: 100,
        eta_minutes: 75,
        status,
    }
}

/// Clock that only moves when told to; clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_ms(&self, millis: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += chrono::Duration::milliseconds(millis);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().expect("clock lock") = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Notifier that records every message; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, NotificationKind)>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, NotificationKind)> {
        self.messages.lock().expect("notifier lock").clone()
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.messages().into_iter().map(|(_, kind)| kind).collect()
    }

    pub fn last(&self) -> Option<(String, NotificationKind)> {
        self.messages().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.lock().expect("notifier lock").clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.messages
            .lock()
            .expect("notifier lock")
            .push((message.to_string(), kind));
    }
}

/// Storage whose writes always fail (quota exceeded, storage disabled, ...).
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    attempts: Arc<AtomicUsize>,
}

impl FailingStore {
    /// Number of write attempts seen so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        bail!("quota exceeded writing {key}")
    }
}

pub type TestStore = RouteStore<MemoryStore, RecordingNotifier>;

/// Distance every harness route is created with (ETA 120 min at 80 km/h).
pub const FIXED_DISTANCE_KM: u32 = 160;

/// A store over in-memory storage with a manual clock and fixed estimates.
pub struct Harness {
    pub storage: MemoryStore,
    pub notifier: RecordingNotifier,
    pub clock: ManualClock,
    pub options: StoreOptions,
    pub store: TestStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_limit(history_limit: usize) -> Self {
        Self::with_options(StoreOptions {
            history_limit,
            ..StoreOptions::default()
        })
    }

    pub fn with_options(options: StoreOptions) -> Self {
        let storage = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let clock = ManualClock::new(base_time());
        let store = open_store(&storage, &notifier, &clock, &options);
        Self {
            storage,
            notifier,
            clock,
            options,
            store,
        }
    }

    /// Open a second store over the same storage, as a new session would.
    pub fn reopen(&self) -> TestStore {
        open_store(&self.storage, &self.notifier, &self.clock, &self.options)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

fn open_store(
    storage: &MemoryStore,
    notifier: &RecordingNotifier,
    clock: &ManualClock,
    options: &StoreOptions,
) -> TestStore {
    RouteStore::open(storage.clone(), notifier.clone(), options.clone())
        .with_clock(clock.clone())
        .with_estimator(FixedEstimator {
            distance_km: FIXED_DISTANCE_KM,
            average_speed_kmh: 80,
        })
}

/// File-backed storage in a fresh temporary directory.
pub fn temp_file_store() -> Result<(tempfile::TempDir, FileStore)> {
    let temp = tempfile::tempdir()?;
    let store = FileStore::new(temp.path().join("data"));
    Ok((temp, store))
}
