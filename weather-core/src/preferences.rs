//! Persistence of [`UserPreferences`] behind a small key-value capability.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    io,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{error::WeatherError, model::UserPreferences};

/// Storage key holding the serialized preferences.
pub const PREFERENCES_KEY: &str = "weatherPreferences";

/// String-to-string storage, in the manner of browser local storage.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, mostly for tests and one-off runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.lock().insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, one member per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents, `None` when nothing has been written yet.
    fn read_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read storage file: {}", self.path.display())),
        }
    }

    fn parse(&self, contents: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(contents)
            .with_context(|| format!("Failed to parse storage file: {}", self.path.display()))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw()? {
            Some(contents) => self.parse(&contents),
            None => Ok(BTreeMap::new()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every later write.
        // Failing to read it at all is reported, the other keys may be fine.
        let mut entries = match self.read_raw()? {
            Some(contents) => self.parse(&contents).unwrap_or_else(|err| {
                warn!(error = %err, "discarding corrupt storage file");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize storage")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write storage file: {}", self.path.display()))?;

        Ok(())
    }
}

/// Owner of the in-memory preferences and their persisted copy.
#[derive(Debug)]
pub struct PreferenceStore {
    store: Box<dyn KeyValueStore>,
    prefs: UserPreferences,
}

impl PreferenceStore {
    /// Loads once from `store`; later reads come from memory.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let prefs = load(store.as_ref());
        Self { store, prefs }
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    /// Applies `change`, then persists the full object.
    ///
    /// The in-memory value keeps the change even when the write fails.
    pub fn modify<R>(
        &mut self,
        change: impl FnOnce(&mut UserPreferences) -> R,
    ) -> (R, Result<(), WeatherError>) {
        let out = change(&mut self.prefs);
        let persisted = self.persist();
        (out, persisted)
    }

    pub fn persist(&self) -> Result<(), WeatherError> {
        persist(self.store.as_ref(), &self.prefs).map_err(WeatherError::Storage)
    }
}

/// Reads preferences from `store`, falling back to defaults when the entry is
/// absent, unreadable, or not valid JSON.
pub fn load(store: &dyn KeyValueStore) -> UserPreferences {
    let raw = match store.get(PREFERENCES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return UserPreferences::default(),
        Err(err) => {
            warn!(error = %err, "failed to read preferences, using defaults");
            return UserPreferences::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(error = %err, "stored preferences are malformed, using defaults");
        UserPreferences::default()
    })
}

pub fn persist(store: &dyn KeyValueStore, prefs: &UserPreferences) -> Result<()> {
    let json = serde_json::to_string(prefs).context("Failed to serialize preferences")?;
    store.set(PREFERENCES_KEY, &json)
}
