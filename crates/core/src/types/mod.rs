//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod id;
pub mod line_item;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use line_item::CartLineItem;
pub use price::{Price, PriceError};
pub use product::{
    Brand, Discount, ImageSet, PricingSummary, ProductColor, ProductImages, ProductRecord,
};
