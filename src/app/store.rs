use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BOOKS_KEY: &str = "sikum-books-v3";
pub const FAVORITES_KEY: &str = "sikum-favorites-v1";
pub const ADMIN_SESSION_KEY: &str = "sikum-is-admin";

/// Named string slots. The key doubles as the schema version.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Reads `key` as JSON, falling back to `initial` on any failure.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, initial: T) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored value, using initial value");
            return initial;
        }
        Err(err) => {
            tracing::error!(key, ?err, "read stored value");
            return initial;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(key, ?err, "parse stored value");
            initial
        }
    }
}

/// Writes `value` as JSON under `key`. Failures are logged and swallowed.
pub fn save<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .context("serialize value")
        .and_then(|raw| store.set(key, &raw));
    if let Err(err) = result {
        tracing::error!(key, ?err, "persist value");
    }
}

/// One `<key>.json` file per slot under `base_dir`.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    base_dir: PathBuf,
}

impl LocalFsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            anyhow::bail!("invalid storage key: {key:?}");
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for LocalFsStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read: {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.slot_path(key)?;
        write_atomic(&path, value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove: {}", path.display())),
        }
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

/// In-process slots. Backs the admin session and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes that would push the total stored bytes over `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                anyhow::bail!("storage quota exceeded ({needed} > {quota} bytes)");
            }
        }
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}
