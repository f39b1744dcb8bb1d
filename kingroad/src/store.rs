//! The route/history store: one active-route slot plus a capped attempt log.
//!
//! Every mutating operation persists the full history before returning. A
//! failed write is logged once and the store carries on in memory for the rest
//! of the session; route operations never fail because storage did.

use tracing::{debug, info, warn};

use crate::core::destination::{normalize_destination, normalize_origin};
use crate::core::estimate::{DistanceEstimator, RandomEstimator};
use crate::core::history::{DEFAULT_HISTORY_LIMIT, History};
use crate::core::invariants::validate_invariants;
use crate::core::types::{
    NotificationKind, QuickDestination, Route, RouteId, RouteStatus, StoreSnapshot,
};
use crate::error::RouteError;
use crate::io::clock::{Clock, SystemClock};
use crate::io::history_store::{DEFAULT_HISTORY_KEY, load_history, save_history};
use crate::io::notify::Notifier;
use crate::io::storage::KeyValueStore;

/// Where and how much history the store keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub history_key: String,
    pub history_limit: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Owns the current route and the history log. Single-threaded; hosts that
/// share it across threads wrap the whole store in one mutex.
pub struct RouteStore<S, N> {
    storage: S,
    notifier: N,
    clock: Box<dyn Clock + Send>,
    estimator: Box<dyn DistanceEstimator + Send>,
    options: StoreOptions,
    current: Option<Route>,
    history: History,
    last_id: Option<RouteId>,
    degraded: bool,
}

impl<S: KeyValueStore, N: Notifier> RouteStore<S, N> {
    /// Load history from `storage` (unreadable data counts as empty) and
    /// resume the newest route if it was still active.
    pub fn open(storage: S, notifier: N, options: StoreOptions) -> Self {
        let loaded = match load_history(&storage, &options.history_key) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    key = %options.history_key,
                    error = %format!("{err:#}"),
                    "stored route history unreadable, starting empty"
                );
                Vec::new()
            }
        };

        let mut history = History::from_entries(loaded, options.history_limit);
        let (current, downgraded) = history.restore();
        let errors = validate_invariants(history.entries(), current.as_ref(), history.limit());
        if !errors.is_empty() {
            warn!(errors = %errors.join("; "), "stored route history violates invariants");
        }

        let mut store = Self {
            storage,
            notifier,
            clock: Box::new(SystemClock),
            estimator: Box::new(RandomEstimator::default()),
            last_id: history.last_id(),
            options,
            current,
            history,
            degraded: false,
        };

        if !downgraded.is_empty() {
            debug!(ids = ?downgraded, "downgraded stale active routes to canceled");
            store.persist();
        }

        info!(
            entries = store.history.len(),
            navigating = store.current.is_some(),
            "route store opened"
        );
        store
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_estimator(mut self, estimator: impl DistanceEstimator + Send + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    /// Start navigating to `destination`, superseding any active route.
    ///
    /// Blank destinations are rejected with an error notification and leave the
    /// store untouched.
    pub fn start_route(
        &mut self,
        destination: &str,
        origin: Option<&str>,
    ) -> Result<Route, RouteError> {
        let Some(destination) = normalize_destination(destination) else {
            self.notifier
                .notify("❌ Enter a valid destination", NotificationKind::Error);
            return Err(RouteError::InvalidDestination);
        };
        let origin = normalize_origin(origin);
        let estimate = self.estimator.estimate(&origin, &destination);
        let route = self.begin(destination, origin, estimate.distance_km, estimate.eta_minutes);
        self.notifier.notify(
            &format!("🗺️ Navigation started to {}", route.destination),
            NotificationKind::Info,
        );
        Ok(route)
    }

    pub fn start_quick_route(&mut self, destination: QuickDestination) -> Result<Route, RouteError> {
        self.start_route(destination.label(), None)
    }

    /// Start a route from free text typed by the user.
    pub fn start_custom_route(&mut self, input: &str) -> Result<Route, RouteError> {
        self.start_route(input, None)
    }

    /// Cancel the active route immediately. Without one this is a warning and a no-op.
    pub fn cancel_route(&mut self) -> Result<Route, RouteError> {
        let Some(mut route) = self.current.take() else {
            self.notifier
                .notify("❌ No active route to cancel", NotificationKind::Warning);
            return Err(RouteError::NoActiveRoute);
        };

        route.cancel_at(self.clock.now());
        self.retain(&route);
        self.persist();

        info!(route_id = %route.id, duration_ms = ?route.duration, "route canceled");
        self.notifier.notify(
            &format!("⚡ Route canceled: {}", route.destination),
            NotificationKind::Success,
        );
        Ok(route)
    }

    /// Start a new attempt copying the destination of history entry `id`.
    ///
    /// The historic entry stays untouched; the new attempt is appended with a
    /// fresh id.
    pub fn reactivate_route(&mut self, id: RouteId) -> Result<Route, RouteError> {
        let Some(historic) = self.history.find(id).cloned() else {
            self.notifier
                .notify("❌ Route not found in history", NotificationKind::Error);
            return Err(RouteError::RouteNotFound(id));
        };

        let route = self.begin(
            historic.destination,
            historic.origin,
            historic.distance_km,
            historic.eta_minutes,
        );
        debug!(from = %id, to = %route.id, "route reactivated");
        self.notifier.notify(
            &format!("🔄 Route reactivated: {}", route.destination),
            NotificationKind::Success,
        );
        Ok(route)
    }

    /// Discard the whole history log. The active route, if any, keeps running.
    pub fn clear_history(&mut self) {
        let removed = self.history.len();
        self.history.clear();
        self.persist();
        info!(removed, "route history cleared");
        self.notifier
            .notify("🗑️ History cleared", NotificationKind::Info);
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn is_navigating(&self) -> bool {
        self.current.is_some()
    }

    /// Full log, oldest first.
    pub fn history(&self) -> &[Route] {
        self.history.entries()
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent_history(&self, limit: usize) -> Vec<&Route> {
        self.history.recent(limit)
    }

    pub fn find(&self, id: RouteId) -> Option<&Route> {
        self.history.find(id)
    }

    pub fn snapshot(&self, recent_limit: usize) -> StoreSnapshot {
        StoreSnapshot {
            current: self.current.clone(),
            recent: self.history.recent(recent_limit).into_iter().cloned().collect(),
        }
    }

    /// True once a write failed and the store stopped persisting.
    pub fn is_persistence_degraded(&self) -> bool {
        self.degraded
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn begin(
        &mut self,
        destination: String,
        origin: String,
        distance_km: u32,
        eta_minutes: u32,
    ) -> Route {
        let now = self.clock.now();
        if let Some(mut previous) = self.current.take() {
            previous.cancel_at(now);
            self.retain(&previous);
            info!(route_id = %previous.id, "superseded active route");
        }

        let id = RouteId::next(now.timestamp_millis(), self.last_id);
        self.last_id = Some(id);
        let route = Route {
            id,
            destination,
            origin,
            start_time: now,
            end_time: None,
            duration: None,
            distance_km,
            eta_minutes,
            status: RouteStatus::Active,
        };

        let evicted = self.history.push(route.clone());
        if evicted > 0 {
            debug!(evicted, limit = self.history.limit(), "evicted oldest routes");
        }
        self.current = Some(route.clone());
        self.persist();

        info!(route_id = %id, destination = %route.destination, "route started");
        route
    }

    /// Keep a route that left the active state in the log, even if the log was
    /// cleared while it was running.
    fn retain(&mut self, route: &Route) {
        if !self.history.replace(route) {
            self.history.push(route.clone());
        }
    }

    fn persist(&mut self) {
        if self.degraded {
            debug!("persistence degraded, history kept in memory only");
            return;
        }
        if let Err(err) = save_history(
            &self.storage,
            &self.options.history_key,
            self.history.entries(),
        ) {
            warn!(
                key = %self.options.history_key,
                error = %format!("{err:#}"),
                "persisting route history failed, keeping it in memory for this session"
            );
            self.degraded = true;
        }
    }
}
