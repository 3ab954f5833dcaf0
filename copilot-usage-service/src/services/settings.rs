//! Persistence of the dashboard's user settings in a key/value store.
//!
//! The token is Base64-encoded before it is stored. That is obfuscation
//! against casual inspection, not encryption.

use crate::constants::USER_SETTINGS_KEY;
use crate::models::{OrgType, UserSettings};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dashmap::DashMap;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value storage in the style of browser `localStorage`.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// On-disk shape. Fields are optional so partial records can be detected.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    org_name: Option<String>,
    #[serde(default)]
    org_type: Option<String>,
}

/// Saves, loads and clears [`UserSettings`].
///
/// Storage failures are logged and swallowed; unreadable data loads as
/// `None`.
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&self, settings: &UserSettings) {
        let stored = StoredSettings {
            token: Some(STANDARD.encode(settings.token.expose_secret())),
            org_name: Some(settings.org_name.clone()),
            org_type: Some(settings.org_type.as_str().to_string()),
        };

        let json = match serde_json::to_string(&stored) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize settings");
                return;
            }
        };

        if let Err(e) = self.store.set_item(USER_SETTINGS_KEY, json) {
            tracing::warn!(error = %e, "Failed to save settings to storage");
        }
    }

    pub fn load(&self) -> Option<UserSettings> {
        let raw = match self.store.get_item(USER_SETTINGS_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings from storage");
                return None;
            }
        };

        let stored: StoredSettings = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Stored settings are not valid JSON");
                return None;
            }
        };

        let (Some(token), Some(org_name), Some(org_type)) = (
            non_empty(stored.token),
            non_empty(stored.org_name),
            non_empty(stored.org_type),
        ) else {
            return None;
        };

        let Ok(org_type) = org_type.parse::<OrgType>() else {
            tracing::warn!(org_type = %org_type, "Stored settings have an unknown org type");
            return None;
        };

        let token = match decode_token(&token) {
            Some(token) => token,
            None => {
                tracing::warn!("Stored token is not valid Base64");
                return None;
            }
        };

        Some(UserSettings {
            token: Secret::new(token),
            org_name,
            org_type,
        })
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove_item(USER_SETTINGS_KEY) {
            tracing::warn!(error = %e, "Failed to clear settings from storage");
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn decode_token(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
