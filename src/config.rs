use std::path::PathBuf;

use anyhow::Context as _;

use crate::app::App;
use crate::app::store::{KeyValueStore, LocalFsStore, MemoryStore};
use crate::router::{MemoryHistory, Router};

pub const DEFAULT_DATA_DIR: &str = "sikum-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// `<data_dir>/<key>.json`, survives restarts.
    Fs,
    /// Discarded on exit.
    Memory,
}

impl StorageBackend {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "fs" | "file" => Ok(Self::Fs),
            "memory" | "mem" => Ok(Self::Memory),
            other => anyhow::bail!("unsupported storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
}

impl Config {
    /// `--data-dir` wins over `SIKUM_DATA_DIR`; `SIKUM_STORAGE` picks the backend.
    pub fn from_env(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::resolve(
            data_dir,
            std::env::var("SIKUM_DATA_DIR").ok(),
            std::env::var("SIKUM_STORAGE").ok(),
        )
    }

    pub fn resolve(
        data_dir: Option<PathBuf>,
        env_data_dir: Option<String>,
        env_storage: Option<String>,
    ) -> anyhow::Result<Self> {
        let data_dir = data_dir
            .or_else(|| {
                env_data_dir
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let raw_storage = env_storage.unwrap_or_default();
        let storage = StorageBackend::parse(&raw_storage).with_context(|| {
            format!("invalid SIKUM_STORAGE={raw_storage:?}. expected one of: fs, memory")
        })?;

        Ok(Self { data_dir, storage })
    }

    pub fn open_store(&self) -> Box<dyn KeyValueStore> {
        match self.storage {
            StorageBackend::Fs => Box::new(LocalFsStore::new(&self.data_dir)),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        }
    }

    /// A fresh session: durable store, empty session store, history starting at `fragment`.
    pub fn open_app(&self, fragment: &str) -> App {
        tracing::debug!(data_dir = %self.data_dir.display(), storage = ?self.storage, fragment, "open app");
        App::new(
            self.open_store(),
            Box::new(MemoryStore::new()),
            Router::new(Box::new(MemoryHistory::new(fragment))),
        )
    }
}
