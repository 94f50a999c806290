//! `CartStore` - the single source of truth for cart contents.

use tracing::{debug, warn};

use super::{Cart, CartStorage, StorageError};
use crate::types::{ProductId, ProductRecord};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "so-cart";

/// Cart service over a [`CartStorage`] backend.
///
/// Every mutating operation re-reads the whole blob, applies one change and
/// writes the whole blob back. The returned [`Cart`] is what was persisted, so
/// callers can re-render from it directly.
#[derive(Debug, Clone, Default)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store over `storage`.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get a reference to the storage backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the cart.
    ///
    /// An absent key yields an empty cart. So does a stored value that fails
    /// to parse; that case is logged and otherwise ignored.
    pub fn load(&self) -> Cart {
        let Some(blob) = self.storage.get_item(CART_KEY) else {
            return Cart::new();
        };

        serde_json::from_str(&blob).unwrap_or_else(|e| {
            warn!(key = CART_KEY, error = %e, "Invalid JSON in cart storage, treating as empty");
            Cart::new()
        })
    }

    /// Persist `cart`, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the backend rejects the write.
    pub fn save(&mut self, cart: &Cart) -> Result<(), StorageError> {
        let blob = serde_json::to_string(cart)?;
        self.storage.set_item(CART_KEY, blob)
    }

    /// Add one unit of `product` and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn add_or_increment(&mut self, product: &ProductRecord) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        cart.add_or_increment(product);
        self.save(&cart)?;
        debug!(product_id = %product.id, units = cart.unit_count(), "Added to cart");
        Ok(cart)
    }

    /// Add `delta` to the quantity of `id` and save.
    ///
    /// Quantities that drop to zero or below remove the line item. An unknown
    /// id leaves storage untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn adjust_quantity(&mut self, id: &ProductId, delta: i64) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        if cart.adjust_quantity(id, delta) {
            self.save(&cart)?;
            debug!(product_id = %id, delta, "Adjusted cart quantity");
        }
        Ok(cart)
    }

    /// Remove the line item for `id` and save if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn remove(&mut self, id: &ProductId) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        if cart.remove(id) {
            self.save(&cart)?;
            debug!(product_id = %id, "Removed from cart");
        }
        Ok(cart)
    }

    /// Delete the stored cart entirely.
    pub fn clear(&mut self) {
        self.storage.remove_item(CART_KEY);
    }
}
