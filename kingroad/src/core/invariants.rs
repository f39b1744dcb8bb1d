//! Semantic invariants of the route log not expressible via JSON Schema.

use std::collections::HashSet;

use crate::core::types::Route;

/// Check invariants over the history log and the current-route slot:
/// - `history.len() <= limit`
/// - No duplicate ids; ids increase in insertion order
/// - At most one `active` entry, and it is the current route
/// - `endTime >= startTime` wherever an end time is recorded
/// - Active entries carry no end time or duration
pub fn validate_invariants(history: &[Route], current: Option<&Route>, limit: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if history.len() > limit {
        errors.push(format!(
            "history holds {} entries, limit is {}",
            history.len(),
            limit
        ));
    }

    let mut seen = HashSet::new();
    for entry in history {
        if !seen.insert(entry.id) {
            errors.push(format!("duplicate id {}", entry.id));
        }
    }

    if !history.windows(2).all(|pair| pair[0].id < pair[1].id) {
        errors.push("ids must increase in insertion order".to_string());
    }

    let active: Vec<&Route> = history.iter().filter(|entry| entry.is_active()).collect();
    if active.len() > 1 {
        errors.push(format!("{} active entries, at most one allowed", active.len()));
    }
    for entry in &active {
        if current.map(|route| route.id) != Some(entry.id) {
            errors.push(format!("active entry {} is not the current route", entry.id));
        }
        if entry.end_time.is_some() || entry.duration.is_some() {
            errors.push(format!("active entry {} has an end time", entry.id));
        }
    }

    if let Some(route) = current {
        if !route.is_active() {
            errors.push(format!("current route {} is not active", route.id));
        }
    }

    for entry in history {
        if let Some(end) = entry.end_time {
            if end < entry.start_time {
                errors.push(format!("entry {}: endTime precedes startTime", entry.id));
            }
        }
    }

    errors
}
