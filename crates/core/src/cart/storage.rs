//! Key-value storage seam for the cart blob.

use std::collections::HashMap;

use thiserror::Error;

/// Errors that can occur when persisting the cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused the write because it would exceed its quota.
    #[error("storage quota exceeded writing {key} ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string key-value storage, shaped like the browser's `localStorage`.
///
/// Implementations are synchronous: the cart store runs read-modify-write
/// cycles against a single writer, so there is no locking here.
pub trait CartStorage {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write. The previous value
    /// must be left intact in that case.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete the value stored under `key`, if any.
    fn remove_item(&mut self, key: &str);
}

/// In-process storage backed by a `HashMap`.
///
/// An optional byte quota mimics the browser's storage limit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create storage that rejects writes once values exceed `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl CartStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_excluding(key));
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
