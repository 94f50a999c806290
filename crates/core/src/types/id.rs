//! Opaque product identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog product.
///
/// The catalog hands out opaque strings (`"1"`, `"t2"`, ...); the cart keys its
/// line items by this value, so two rows never share an id.
///
/// # Example
///
/// ```rust
/// # use sleepoutside_core::ProductId;
/// let id = ProductId::new("t1");
/// assert_eq!(id.as_str(), "t1");
/// assert_eq!(id.to_string(), "t1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
