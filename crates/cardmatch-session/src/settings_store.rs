//! Persisted user settings.
//!
//! Settings live in a flat key-value store, one JSON value per
//! [`SettingKey`]. Loading validates every key on its own: a missing,
//! wrong-typed or out-of-enum value falls back to that key's default and
//! never poisons the others.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use cardmatch_types::{CardmatchError, Result, SettingKey, TradeSettings, clamp_message};
use serde_json::{Map, Value};

/// Key-value backend for settings.
pub trait SettingsStore {
    /// Stored value for `key`, `None` if never set.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`. Deleting a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by one JSON object on disk. Every write rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Serialization` if it is not a
    /// JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                other => {
                    return Err(CardmatchError::Serialization(format!(
                        "settings file {} holds {other}, expected an object",
                        path.display()
                    )));
                }
            }
        } else {
            Map::new()
        };
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Loads, saves and resets [`TradeSettings`] against a store.
#[derive(Debug)]
pub struct SettingsManager<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> SettingsManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Read every key, keeping the default for any value that is missing
    /// or fails validation.
    pub fn load(&self) -> TradeSettings {
        let mut settings = TradeSettings::default();
        for key in SettingKey::ALL {
            let value = match self.store.get(key.as_str()) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Setting unreadable, using default");
                    continue;
                }
            };
            if let Err(err) = settings.apply(key, &value) {
                tracing::warn!(%key, %value, error = %err, "Invalid setting, using default");
            }
        }
        settings
    }

    /// Write every key. The message is stored already truncated.
    ///
    /// # Errors
    /// Any store write error; keys written before it stay written.
    pub fn save(&mut self, settings: &TradeSettings) -> Result<()> {
        let normalized = TradeSettings {
            message: clamp_message(&settings.message),
            ..settings.clone()
        };
        for key in SettingKey::ALL {
            self.store.set(key.as_str(), normalized.value_of(key))?;
        }
        tracing::info!(order = %normalized.order, auto_send = normalized.auto_send, "Settings saved");
        Ok(())
    }

    /// Delete every key, so the next [`load`](Self::load) yields defaults.
    pub fn restore_defaults(&mut self) -> Result<TradeSettings> {
        for key in SettingKey::ALL {
            self.store.delete(key.as_str())?;
        }
        tracing::info!("Settings restored to defaults");
        Ok(TradeSettings::default())
    }
}
