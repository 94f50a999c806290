//! Session-backed cart storage.
//!
//! The cart blob lives in the client's session record. Because
//! [`CartStore`] is synchronous and `tower-sessions` is not, each request
//! takes a snapshot of the keys it needs, runs one store operation against the
//! snapshot, and flushes changed keys back to the session before rendering.

use std::collections::{HashMap, HashSet};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sleepoutside_core::cart::{CART_KEY, CartStorage, CartStore, StorageError};
use sleepoutside_core::Cart;
use tower_sessions::Session;
use tracing::warn;

use crate::error::AppError;

/// Marks a session as belonging to a visitor, so the record is kept even
/// while the cart is empty.
const VISITOR_KEY: &str = "so-visitor";

/// Stable key identifying the client behind `session`.
///
/// Uses the id from the session cookie without loading the record. A client
/// without a cookie gets a new record on the spot.
///
/// # Errors
///
/// Returns an error if a new session record cannot be saved.
pub async fn client_key(session: &Session) -> Result<String, AppError> {
    if let Some(id) = session.id() {
        return Ok(id.to_string());
    }

    session.insert(VISITOR_KEY, true).await?;
    session.save().await?;
    session
        .id()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::Internal("session has no id after save".to_string()))
}

/// Snapshot of selected session keys, implementing [`CartStorage`].
#[derive(Debug, Clone, Default)]
pub struct SessionCartStorage {
    values: HashMap<String, String>,
    changed: HashSet<String>,
}

impl SessionCartStorage {
    /// Read `keys` from the session.
    ///
    /// A value that is not a string is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session, keys: &[&str]) -> Result<Self, tower_sessions::session::Error> {
        let mut values = HashMap::new();
        for key in keys {
            match session.get_value(key).await? {
                Some(serde_json::Value::String(blob)) => {
                    values.insert((*key).to_owned(), blob);
                }
                Some(other) => {
                    warn!(key, kind = ?other, "Unexpected session value type, ignoring");
                }
                None => {}
            }
        }

        Ok(Self {
            values,
            changed: HashSet::new(),
        })
    }

    /// Returns true if any key was written or removed since loading.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Write changed keys back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn flush(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in &self.changed {
            match self.values.get(key) {
                Some(blob) => session.insert(key, blob).await?,
                None => {
                    session.remove_value(key).await?;
                }
            }
        }
        Ok(())
    }
}

impl CartStorage for SessionCartStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value);
        self.changed.insert(key.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.values.remove(key);
        self.changed.insert(key.to_owned());
    }
}

/// The requesting client's cart store.
///
/// Extracted per request. Run store operations through [`Self::store_mut`],
/// then call [`Self::commit`] before rendering.
pub struct SessionCart {
    session: Session,
    store: CartStore<SessionCartStorage>,
}

impl SessionCart {
    /// Load the cart snapshot for `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self, AppError> {
        let storage = SessionCartStorage::load(&session, &[CART_KEY]).await?;
        Ok(Self {
            session,
            store: CartStore::new(storage),
        })
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// The cart store, for mutations.
    pub const fn store_mut(&mut self) -> &mut CartStore<SessionCartStorage> {
        &mut self.store
    }

    /// Make sure the client ends this request holding a session cookie.
    ///
    /// Pages that offer add-to-cart call this, so the first click already
    /// carries the session id its add-to-cart guard is keyed by.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn ensure_visitor(&self) -> Result<(), AppError> {
        if self.session.id().is_none() {
            self.session.insert(VISITOR_KEY, true).await?;
        }
        Ok(())
    }

    /// Persist any changes made through [`Self::store_mut`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn commit(&self) -> Result<(), AppError> {
        if self.store.storage().is_dirty() {
            self.store.storage().flush(&self.session).await?;
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Internal(message.to_string()))?;
        Self::load(session).await
    }
}
