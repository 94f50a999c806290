//! The shopping cart and its persistence.
//!
//! - [`Cart`] - ordered line items, unique by product id, with the pure
//!   mutation rules (add-or-increment, adjust, remove)
//! - [`CartStorage`] - key-value storage seam (`get_item` / `set_item`)
//! - [`CartStore`] - load-modify-save service over one storage key

mod storage;
mod store;

pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::{CART_KEY, CartStore};

use serde::{Deserialize, Serialize};

use crate::types::{CartLineItem, Price, ProductId, ProductRecord};

/// Ordered cart contents.
///
/// Serializes as a bare JSON array of [`CartLineItem`]. No two line items share
/// an id; insertion order is kept, and removal deletes in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing row for `product.id`, or appends a new row
    /// snapshotted from the product with quantity 1.
    pub fn add_or_increment(&mut self, product: &ProductRecord) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.set_quantity(item.quantity().saturating_add(1));
        } else {
            self.items.push(CartLineItem::from_product(product));
        }
    }

    /// Add `delta` to the quantity of `id`.
    ///
    /// A resulting quantity of zero or less removes the row. Returns false,
    /// leaving the cart untouched, if `id` is not in the cart.
    pub fn adjust_quantity(&mut self, id: &ProductId, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };

        let updated = i64::from(item.quantity()).saturating_add(delta);
        if updated <= 0 {
            self.items.retain(|item| &item.id != id);
        } else {
            item.set_quantity(u32::try_from(updated).unwrap_or(u32::MAX));
        }
        true
    }

    /// Remove the row for `id`. Returns true if a row was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Sum of all line totals, unrounded.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total units across all line items.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<CartLineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLineItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
