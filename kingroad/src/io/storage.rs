//! Key-value persistence port and its adapters.
//!
//! The store only ever reads and overwrites whole values under a fixed key, so
//! the port is two calls wide. `FileStore` targets disk, `MemoryStore` backs
//! tests and hosts that opt out of persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use tracing::debug;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("key regex is valid"));

/// Minimal synchronous key-value store.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Durably overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One file per key (`<dir>/<key>.json`), written atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!(path = %path.display(), "no stored value");
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        debug!(path = %path.display(), bytes = value.len(), "writing stored value");
        write_atomic(&path, value)
    }
}

/// In-memory store; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if !KEY_RE.is_match(key) || key.starts_with('.') {
        bail!("invalid storage key {key:?}: use letters, digits, '_', '-' or '.'");
    }
    Ok(())
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("storage path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp value {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace value {}", path.display()))?;
    Ok(())
}
