//! Typed settings stored as JSON under a single key.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::database::SettingsStore;
use crate::Result;

/// A JSON-encoded value living under one key of a [`SettingsStore`].
///
/// Missing or unreadable values fall back to the default, so a corrupted entry
/// never blocks the UI from coming up.
pub struct Setting<T> {
    store: Arc<dyn SettingsStore>,
    key: String,
    default: T,
}

impl<T> Setting<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: Arc<dyn SettingsStore>, key: impl Into<String>, default: T) -> Self {
        Self {
            store,
            key: key.into(),
            default,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Result<T> {
        let Some(raw) = self.store.get_setting(&self.key)? else {
            return Ok(self.default.clone());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable setting");
                Ok(self.default.clone())
            }
        }
    }

    pub fn set(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set_setting(&self.key, &raw)
    }

    /// Read-modify-write; the closure returns whether anything changed.
    pub fn update<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut value = self.get()?;
        if !f(&mut value) {
            return Ok(false);
        }
        self.set(&value)?;
        Ok(true)
    }
}

impl<T: Clone> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            default: self.default.clone(),
        }
    }
}
