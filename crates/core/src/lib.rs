//! SleepOutside Core - cart state machine and shared types.
//!
//! This crate provides the domain model used by the storefront:
//! - `types` - product records, cart line items, prices and identifiers
//! - `cart` - the cart itself, the storage seam, and the `CartStore` service
//!
//! # Architecture
//!
//! The core crate contains no HTTP and no rendering. Storage is reached only
//! through the [`cart::CartStorage`] trait, so the storefront decides where the
//! cart blob actually lives (the client's session record in production, an
//! in-memory map in tests).
//!
//! # Example
//!
//! ```
//! use sleepoutside_core::cart::{CartStore, MemoryStorage};
//! use sleepoutside_core::{Price, ProductId, ProductRecord};
//!
//! let product = ProductRecord::new(ProductId::new("1"), "Awesome Widget", Price::from_cents(7999));
//!
//! let mut store = CartStore::new(MemoryStorage::default());
//! store.add_or_increment(&product).unwrap();
//! let cart = store.add_or_increment(&product).unwrap();
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.unit_count(), 2);
//! assert_eq!(cart.total().to_string(), "$159.98");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartStore};
pub use types::*;
