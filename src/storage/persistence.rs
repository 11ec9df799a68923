// src/storage/persistence.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::SecondsFormat;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};

use super::KeyValueStore;

/// Stamp added to every object value written through [`Persistence::save`].
pub const SAVED_AT_FIELD: &str = "_savedAt";

/// Namespaced JSON persistence over a raw [`KeyValueStore`].
pub struct Persistence {
    prefix: String,
    backend: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(
        prefix: impl Into<String>,
        backend: Box<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            backend,
            clock,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Raw backend, bypassing the namespace and JSON layer.
    pub fn backend_mut(&mut self) -> &mut dyn KeyValueStore {
        self.backend.as_mut()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Write `value` under `key`. Objects get a `_savedAt` ISO-8601 stamp;
    /// arrays and scalars are stored as given.
    pub fn save(&mut self, key: &str, value: &JsonValue) -> AppResult<()> {
        let mut value = value.clone();
        if let JsonValue::Object(map) = &mut value {
            let stamp = self
                .clock
                .now_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true);
            map.insert(SAVED_AT_FIELD.to_string(), JsonValue::String(stamp));
        }

        let text = serde_json::to_string(&value)
            .map_err(|e| AppError::StoreWriteFailed(format!("json encode: {e}")))?;

        self.backend.set(&self.full_key(key), &text)
    }

    pub fn save_as<T: Serialize>(&mut self, key: &str, value: &T) -> AppResult<()> {
        let v = serde_json::to_value(value)
            .map_err(|e| AppError::StoreWriteFailed(format!("json encode: {e}")))?;
        self.save(key, &v)
    }

    pub fn load(&self, key: &str) -> AppResult<Option<JsonValue>> {
        let Some(text) = self.backend.get(&self.full_key(key))? else {
            return Ok(None);
        };

        let v = serde_json::from_str(&text).map_err(|e| AppError::StoreInvalidJson {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Some(v))
    }

    pub fn load_as<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(v) = self.load(key)? else {
            return Ok(None);
        };

        let t = serde_json::from_value(v).map_err(|e| AppError::StoreInvalidJson {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Some(t))
    }

    pub fn delete(&mut self, key: &str) -> AppResult<()> {
        self.backend.remove(&self.full_key(key))
    }

    /// Remove every key in this namespace. Returns how many were removed.
    pub fn clear_namespace(&mut self) -> AppResult<usize> {
        let keys: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(&self.prefix))
            .collect();

        for k in &keys {
            self.backend.remove(k)?;
        }
        Ok(keys.len())
    }

    /// Every readable value in this namespace, keyed without the prefix.
    /// Entries that fail to parse are skipped.
    pub fn load_all(&self) -> AppResult<BTreeMap<String, JsonValue>> {
        let mut out = BTreeMap::new();

        for full in self.backend.keys()? {
            let Some(key) = full.strip_prefix(&self.prefix) else {
                continue;
            };

            match self.load(key) {
                Ok(Some(v)) => {
                    out.insert(key.to_string(), v);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(key, error = %e, "skipping unreadable store entry"),
            }
        }

        Ok(out)
    }
}

/// The `_savedAt` stamp of a loaded object, if present.
pub fn saved_at(value: &JsonValue) -> Option<&str> {
    value.get(SAVED_AT_FIELD).and_then(JsonValue::as_str)
}

// ======================================================
// Unit Tests
// ======================================================
