// Local persistence for the client store
//
// The store snapshot is kept under one namespaced key of a key-value store.
// It is loaded once when the store is built and written after every
// mutation. The value is wrapped in a versioned envelope:
//
//   { "camera-store": { "state": { "cameras": [...], "facilities": [...] }, "version": 0 } }

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::camera::Camera;
use crate::error::PersistenceError;
use crate::facility::Facility;

/// Key under which the store snapshot is saved
pub const STORE_KEY: &str = "camera-store";

/// Current snapshot format version
pub const STORE_VERSION: u32 = 0;

/// Durable string key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// Serialized contents of the client store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: StoreSnapshot,
    #[serde(default)]
    version: u32,
}

/// Loads and saves the store snapshot under a single key
#[derive(Clone)]
pub struct StatePersistence {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl StatePersistence {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, STORE_KEY)
    }

    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// JSON file persistence at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonFileStore::new(path)))
    }

    /// Load the saved snapshot; an absent key yields an empty snapshot
    pub fn load(&self) -> Result<StoreSnapshot, PersistenceError> {
        match self.backend.get(&self.key)? {
            Some(raw) => {
                let envelope: Envelope = serde_json::from_str(&raw)?;
                debug!(
                    key = %self.key,
                    version = envelope.version,
                    cameras = envelope.state.cameras.len(),
                    facilities = envelope.state.facilities.len(),
                    "Loaded store snapshot"
                );
                Ok(envelope.state)
            }
            None => Ok(StoreSnapshot::default()),
        }
    }

    pub fn save(&self, snapshot: &StoreSnapshot) -> Result<(), PersistenceError> {
        let envelope = Envelope {
            state: snapshot.clone(),
            version: STORE_VERSION,
        };
        self.backend.set(&self.key, serde_json::to_string(&envelope)?)
    }
}

/// Key-value store backed by one JSON object in a file
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => {
                let values: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)?;
                values
                    .into_iter()
                    .map(|(k, v)| Ok((k, serde_json::to_string(&v)?)))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let mut entries: BTreeMap<String, serde_json::Value> = self
            .read_all()?
            .into_iter()
            .map(|(k, v)| Ok((k, serde_json::from_str(&v)?)))
            .collect::<Result<_, PersistenceError>>()?;
        entries.insert(key.to_string(), serde_json::from_str(&value)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKeyValueStore;

    #[test]
    fn test_missing_key_loads_empty_snapshot() {
        let persistence = StatePersistence::new(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(persistence.load().unwrap(), StoreSnapshot::default());
    }

    #[test]
    fn test_save_wraps_state_in_versioned_envelope() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = StatePersistence::new(kv.clone());
        let snapshot = StoreSnapshot {
            cameras: vec![],
            facilities: vec![Facility::new("Plant A", "1 Main St")],
        };

        persistence.save(&snapshot).unwrap();

        let raw = kv.get(STORE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["facilities"][0]["name"], "Plant A");
        assert_eq!(persistence.load().unwrap(), snapshot);
    }

    #[test]
    fn test_json_file_store_keeps_other_keys() {
        let dir = std::env::temp_dir().join(format!("sitewatch-test-{}", uuid::Uuid::now_v7()));
        let store = JsonFileStore::new(dir.join("state.json"));

        store.set("other", "{\"keep\":true}".to_string()).unwrap();
        store.set(STORE_KEY, "{\"state\":{}}".to_string()).unwrap();

        assert_eq!(store.get("other").unwrap().unwrap(), "{\"keep\":true}");
        assert!(store.get(STORE_KEY).unwrap().is_some());
        assert!(store.get("missing").unwrap().is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_json_file_store_missing_file_is_empty() {
        let store = JsonFileStore::new(std::env::temp_dir().join("sitewatch-does-not-exist.json"));
        assert!(store.get(STORE_KEY).unwrap().is_none());
    }
}
