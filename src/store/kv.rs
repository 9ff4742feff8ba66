use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Durable key-value store: one JSON file per key under a data directory.
/// `get` never fails — an absent or corrupt value falls back to the provided
/// default; `set` serializes and stores unconditionally.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to read store key '{}': {}", key, e);
                }
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Corrupt value under store key '{}', using default: {}", key, e);
                default
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let payload = serde_json::to_vec_pretty(value)
            .with_context(|| format!("serializing store key '{key}'"))?;
        // write-then-rename so a crash never leaves a half-written value
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let path = self.path_for(key);
        fs::write(&tmp, payload).with_context(|| format!("writing store key '{key}'"))?;
        fs::rename(&tmp, &path).with_context(|| format!("committing store key '{key}'"))?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
