//! Route history load/save helpers with schema + invariant validation.

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::types::Route;
use crate::io::storage::KeyValueStore;

/// Storage key the history has always been written under.
pub const DEFAULT_HISTORY_KEY: &str = "kingroad_route_history";

const V1_SCHEMA: &str = include_str!("../../../schemas/route_history/v1.schema.json");

/// Load and validate the persisted history.
///
/// Returns an empty log when nothing is stored; malformed values are errors so
/// the caller decides how to degrade.
pub fn load_history<S: KeyValueStore + ?Sized>(storage: &S, key: &str) -> Result<Vec<Route>> {
    let Some(raw) = storage.get(key)? else {
        debug!(key, "no stored route history");
        return Ok(Vec::new());
    };
    parse_history(&raw).with_context(|| format!("parse stored history {key}"))
}

/// Serialize and overwrite the full history under `key`.
pub fn save_history<S: KeyValueStore + ?Sized>(storage: &S, key: &str, history: &[Route]) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(history).context("serialize route history")?;
    buf.push('\n');
    storage
        .set(key, &buf)
        .with_context(|| format!("write stored history {key}"))?;
    debug!(key, entries = history.len(), "route history saved");
    Ok(())
}

/// Parse a history document, checking it against the v1 schema first.
pub fn parse_history(raw: &str) -> Result<Vec<Route>> {
    let value: Value = serde_json::from_str(raw).context("parse history json")?;
    validate_schema(&value)?;
    let history: Vec<Route> = serde_json::from_value(value).context("deserialize history")?;
    Ok(history)
}

fn validate_schema(history: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(V1_SCHEMA).context("parse history schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(history) {
        let messages = compiled
            .iter_errors(history)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "history schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RouteStatus;
    use crate::io::storage::MemoryStore;
    use crate::test_support::route;

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStore::new();
        let mut canceled = route(1, "Salvador", RouteStatus::Canceled);
        canceled.cancel_at(canceled.start_time + chrono::Duration::seconds(90));
        let history = vec![canceled, route(2, "Recife", RouteStatus::Active)];

        save_history(&storage, DEFAULT_HISTORY_KEY, &history).expect("save");
        let loaded = load_history(&storage, DEFAULT_HISTORY_KEY).expect("load");
        assert_eq!(loaded, history);
    }

    #[test]
    fn missing_key_loads_empty() {
        let storage = MemoryStore::new();
        assert!(load_history(&storage, DEFAULT_HISTORY_KEY).expect("load").is_empty());
    }

    #[test]
    fn accepts_browser_written_history() {
        let raw = r#"[{"id":1735732800000,"destination":"Brasília","origin":"Current location",
            "startTime":"2025-01-01T12:00:00.000Z","status":"canceled","distance":233,
            "estimatedTime":174,"endTime":"2025-01-01T12:05:00.000Z","duration":300000}]"#;
        let history = parse_history(raw).expect("parse");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].duration, Some(300_000));
    }

    #[test]
    fn rejects_unknown_status() {
        let raw = r#"[{"id":1,"destination":"x","origin":"y","startTime":"2025-01-01T12:00:00Z",
            "distance":1,"estimatedTime":1,"status":"paused"}]"#;
        let err = parse_history(raw).expect_err("should fail");
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn rejects_ids_beyond_exact_browser_integers() {
        let raw = format!(
            r#"[{{"id":{},"destination":"x","origin":"y","startTime":"2025-01-01T12:00:00Z",
            "distance":1,"estimatedTime":1,"status":"canceled"}}]"#,
            u64::MAX
        );
        let err = parse_history(&raw).expect_err("should fail");
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn rejects_non_array_document() {
        assert!(parse_history(r#"{"routes":[]}"#).is_err());
        assert!(parse_history("not json").is_err());
    }
}
