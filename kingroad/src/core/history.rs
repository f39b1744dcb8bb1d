//! Bounded, insertion-ordered log of route attempts.

use crate::core::types::{Route, RouteId};

/// Default cap on retained route attempts.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// FIFO log capped at `limit` entries; oldest entries are evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<Route>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Build from a previously persisted log, keeping only the newest `limit` entries.
    pub fn from_entries(mut entries: Vec<Route>, limit: usize) -> Self {
        let limit = limit.max(1);
        if entries.len() > limit {
            entries.drain(..entries.len() - limit);
        }
        Self { entries, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Route] {
        &self.entries
    }

    /// Append, first dropping the oldest entries so the result holds at most `limit`.
    ///
    /// Returns the number of evicted entries.
    pub fn push(&mut self, route: Route) -> usize {
        let evicted = (self.entries.len() + 1).saturating_sub(self.limit);
        if evicted > 0 {
            self.entries.drain(..evicted);
        }
        self.entries.push(route);
        evicted
    }

    /// Overwrite the entry sharing `route.id`. Returns false when no entry matches.
    pub fn replace(&mut self, route: &Route) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == route.id) {
            Some(entry) => {
                *entry = route.clone();
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: RouteId) -> Option<&Route> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<&Route> {
        self.entries.iter().rev().take(limit).collect()
    }

    pub fn last_id(&self) -> Option<RouteId> {
        self.entries.iter().map(|entry| entry.id).max()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Split a freshly loaded log into its active tail and a consistent history.
    ///
    /// The newest entry is handed back as the current route when it is still
    /// active. Any older `active` entries were abandoned by an earlier session and
    /// are canceled as of the start of the entry that followed them; their ids
    /// are returned for logging.
    pub fn restore(&mut self) -> (Option<Route>, Vec<RouteId>) {
        let next_starts: Vec<_> = self
            .entries
            .iter()
            .skip(1)
            .map(|entry| entry.start_time)
            .collect();
        let mut downgraded = Vec::new();
        for (entry, superseded_at) in self.entries.iter_mut().zip(next_starts) {
            if entry.is_active() {
                entry.cancel_at(superseded_at);
                downgraded.push(entry.id);
            }
        }
        let current = self.entries.last().filter(|entry| entry.is_active()).cloned();
        (current, downgraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RouteStatus;
    use crate::test_support::route;

    fn ids(history: &History) -> Vec<u64> {
        history.entries().iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn push_evicts_oldest_at_cap() {
        let mut history = History::new(3);
        for id in 1..=3 {
            assert_eq!(history.push(route(id, "x", RouteStatus::Canceled)), 0);
        }
        assert_eq!(history.push(route(4, "x", RouteStatus::Canceled)), 1);
        assert_eq!(ids(&history), vec![2, 3, 4]);
    }

    #[test]
    fn from_entries_keeps_newest() {
        let entries = (1..=5).map(|id| route(id, "x", RouteStatus::Canceled)).collect();
        let history = History::from_entries(entries, 2);
        assert_eq!(ids(&history), vec![4, 5]);
    }

    #[test]
    fn replace_updates_in_place() {
        let mut history = History::new(5);
        history.push(route(1, "a", RouteStatus::Active));
        history.push(route(2, "b", RouteStatus::Canceled));

        let mut updated = route(1, "a", RouteStatus::Canceled);
        updated.duration = Some(10);
        assert!(history.replace(&updated));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0], updated);

        assert!(!history.replace(&route(9, "z", RouteStatus::Canceled)));
    }

    #[test]
    fn recent_is_most_recent_first() {
        let mut history = History::new(10);
        for id in 1..=4 {
            history.push(route(id, "x", RouteStatus::Canceled));
        }
        let recent: Vec<u64> = history.recent(3).iter().map(|r| r.id.0).collect();
        assert_eq!(recent, vec![4, 3, 2]);
    }

    #[test]
    fn restore_returns_active_tail_and_downgrades_stale_entries() {
        let mut history = History::from_entries(
            vec![
                route(1, "a", RouteStatus::Active),
                route(2, "b", RouteStatus::Canceled),
                route(3, "c", RouteStatus::Active),
            ],
            50,
        );
        let (current, downgraded) = history.restore();
        assert_eq!(current.map(|r| r.id), Some(RouteId(3)));
        assert_eq!(downgraded, vec![RouteId(1)]);
        assert_eq!(history.entries()[0].status, RouteStatus::Canceled);
    }

    #[test]
    fn restore_stamps_downgraded_entries_at_next_start() {
        let stale = route(1, "a", RouteStatus::Active);
        let mut next = route(2, "b", RouteStatus::Active);
        next.start_time = stale.start_time + chrono::Duration::minutes(7);
        let mut history = History::from_entries(vec![stale, next.clone()], 50);

        history.restore();
        let downgraded = &history.entries()[0];
        assert_eq!(downgraded.end_time, Some(next.start_time));
        assert_eq!(downgraded.duration, Some(7 * 60 * 1000));
    }

    #[test]
    fn restore_without_active_tail_has_no_current() {
        let mut history = History::from_entries(vec![route(1, "a", RouteStatus::Canceled)], 50);
        let (current, downgraded) = history.restore();
        assert!(current.is_none());
        assert!(downgraded.is_empty());
    }
}
