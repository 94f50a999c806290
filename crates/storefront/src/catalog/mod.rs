//! Product catalog lookup.
//!
//! The catalog is an external collaborator: the storefront never writes to it
//! and only asks it to resolve product ids. [`ProductCatalog`] is the seam;
//! [`MockCatalog`] serves the built-in demo products or a JSON file.

mod mock;

pub use mock::MockCatalog;

use async_trait::async_trait;
use sleepoutside_core::{ProductId, ProductRecord};
use thiserror::Error;

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached.
    #[error("Catalog unavailable: {0}")]
    Transport(String),

    /// Catalog data could not be read.
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog data could not be parsed.
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Asynchronous product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Resolve a product id. `Ok(None)` means the product does not exist.
    async fn find_product_by_id(&self, id: &ProductId)
    -> Result<Option<ProductRecord>, CatalogError>;

    /// All products, in catalog order.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError>;
}
