//! Configuration stored under `<data-dir>/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::estimate::RandomEstimator;
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::io::history_store::DEFAULT_HISTORY_KEY;
use crate::store::StoreOptions;

/// KingRoad configuration (TOML).
///
/// Missing fields fall back to the values the browser client always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KingroadConfig {
    /// Storage key the route history is persisted under.
    pub history_key: String,

    /// Maximum number of route attempts kept in history.
    pub history_limit: usize,

    /// Number of history entries shown in the recent-destinations panel.
    pub recent_limit: usize,

    pub estimator: EstimatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EstimatorConfig {
    pub min_distance_km: u32,
    pub max_distance_km: u32,
    /// Average speed used to derive the ETA from the distance.
    pub average_speed_kmh: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        let defaults = RandomEstimator::default();
        Self {
            min_distance_km: defaults.min_km,
            max_distance_km: defaults.max_km,
            average_speed_kmh: defaults.average_speed_kmh,
        }
    }
}

impl Default for KingroadConfig {
    fn default() -> Self {
        Self {
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            recent_limit: 10,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl KingroadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.history_key.trim().is_empty() {
            return Err(anyhow!("history_key must be non-empty"));
        }
        if self.history_limit == 0 {
            return Err(anyhow!("history_limit must be > 0"));
        }
        if self.recent_limit == 0 {
            return Err(anyhow!("recent_limit must be > 0"));
        }
        if self.estimator.min_distance_km > self.estimator.max_distance_km {
            return Err(anyhow!(
                "estimator.min_distance_km must be <= estimator.max_distance_km"
            ));
        }
        if self.estimator.average_speed_kmh == 0 {
            return Err(anyhow!("estimator.average_speed_kmh must be > 0"));
        }
        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            history_key: self.history_key.clone(),
            history_limit: self.history_limit,
        }
    }

    pub fn estimator(&self) -> RandomEstimator {
        RandomEstimator {
            min_km: self.estimator.min_distance_km,
            max_km: self.estimator.max_distance_km,
            average_speed_kmh: self.estimator.average_speed_kmh,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `KingroadConfig::default()`.
pub fn load_config(path: &Path) -> Result<KingroadConfig> {
    if !path.exists() {
        let cfg = KingroadConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: KingroadConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &KingroadConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
