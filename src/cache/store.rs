use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;

/// Uniform key-value interface shared by both cache tiers and the
/// demo-mode flag. Implementations never surface I/O errors: a backend
/// that cannot read or write behaves as always-empty.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process map tier. Entries live for the lifetime of the process;
/// staleness is the persistent tier's concern.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Persistent tier backed by a single JSON file holding a flat string map.
/// Survives process restarts; any read or write failure is logged and
/// swallowed so callers only ever observe a miss.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_map(&self) -> HashMap<String, String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                warn!("cache file {:?} unreadable: {}", self.path, err);
                return HashMap::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(map) => map,
            Err(err) => {
                warn!("cache file {:?} corrupt, starting empty: {}", self.path, err);
                HashMap::new()
            }
        }
    }

    fn save_map(&self, map: &HashMap<String, String>) {
        let json = match serde_json::to_string(map) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to serialize cache map: {}", err);
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, json) {
            warn!("failed to write cache file {:?}: {}", self.path, err);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load_map().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        let mut map = self.load_map();
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.load_map();
        if map.remove(key).is_some() {
            self.save_map(&map);
        }
    }
}
