use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

pub const WEBHOOK_URL_KEY: &str = "webhookUrl";
pub const DEFAULT_PREDICT_URL: &str = "/api/predict";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: Option<String>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: stored_url(&url).map(str::to_string),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

/// The value actually persisted for a user-entered URL. `None` means the
/// key is removed.
pub fn stored_url(raw: &str) -> Option<&str> {
    let url = raw.trim();
    (!url.is_empty()).then_some(url)
}

/// Persistent home of the webhook URL. Backends only provide the raw key
/// operations; `get` and `set` are shared by all of them.
pub trait ConfigStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError>;

    fn write_raw(&self, url: &str) -> Result<(), StoreError>;

    fn remove_raw(&self) -> Result<(), StoreError>;

    /// Never fails: a missing or unreadable value is "not configured".
    fn get(&self) -> WebhookConfig {
        match self.read_raw() {
            Ok(Some(url)) => WebhookConfig::new(url),
            Ok(None) => WebhookConfig::default(),
            Err(e) => {
                log::warn!("Webhook URL unreadable: {}", e);
                WebhookConfig::default()
            }
        }
    }

    /// Saving an empty string removes the value.
    fn set(&self, url: &str) -> Result<(), StoreError> {
        match stored_url(url) {
            Some(url) => self.write_raw(url),
            None => self.remove_raw(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_url(url: &str) -> Self {
        let store = Self::default();
        *store.value.borrow_mut() = Some(url.to_string());
        store
    }
}

impl MemoryStore {
    /// What a browser would find under the key.
    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.borrow().clone())
    }

    fn write_raw(&self, url: &str) -> Result<(), StoreError> {
        *self.value.borrow_mut() = Some(url.to_string());
        Ok(())
    }

    fn remove_raw(&self) -> Result<(), StoreError> {
        self.value.borrow_mut().take();
        Ok(())
    }
}

/// Runtime settings the host hands to the browser at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub predict_url: String,
    /// Replace failed predictions with simulated ones. Demo deployments only.
    #[serde(default)]
    pub demo_fallback: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            predict_url: DEFAULT_PREDICT_URL.to_string(),
            demo_fallback: false,
        }
    }
}
