//! In-memory catalog with simulated latency.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sleepoutside_core::{ProductId, ProductRecord};
use tracing::{debug, instrument};

use super::{CatalogError, ProductCatalog};

/// Built-in demo products.
const BUILTIN_PRODUCTS: &str = r#"[
  {
    "Id": "1",
    "Name": "Awesome Widget",
    "Brand": { "Name": "WidgetCo" },
    "DescriptionHtmlSimple": "An awesome widget for all your widget needs.",
    "Images": {
      "PrimaryLarge": "https://via.placeholder.com/800x600?text=Widget+Large",
      "PrimaryMedium": "https://via.placeholder.com/400x300?text=Widget+Medium"
    },
    "SuggestedRetailPrice": 99.99,
    "ListPrice": 89.99,
    "FinalPrice": 79.99
  },
  {
    "Id": "2",
    "Name": "Great Gadget",
    "Brand": { "Name": "GadgetCorp" },
    "DescriptionHtmlSimple": "A great gadget that does lots of things.",
    "Images": {
      "PrimaryLarge": "https://via.placeholder.com/800x600?text=Gadget+Large",
      "PrimaryMedium": "https://via.placeholder.com/400x300?text=Gadget+Medium"
    },
    "SuggestedRetailPrice": 149.99,
    "ListPrice": 139.99,
    "FinalPrice": 139.99
  },
  {
    "Id": "t1",
    "Name": "Marmot Ajax Tent",
    "Image": "../images/tents/marmot-ajax-tent.jpg",
    "FinalPrice": 199.99
  },
  {
    "Id": "t2",
    "Name": "Mountain Ultra Tent",
    "Image": "../images/tents/mountain-ultra-tent.jpg",
    "FinalPrice": 159.95
  }
]"#;

/// Catalog backed by a fixed product list.
///
/// Cheaply cloneable via `Arc`.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    products: Arc<[ProductRecord]>,
    latency: Duration,
}

impl MockCatalog {
    /// Catalog over an explicit product list, with no latency.
    #[must_use]
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products: products.into(),
            latency: Duration::ZERO,
        }
    }

    /// Catalog over the built-in demo products.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded product data fails to parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PRODUCTS)
    }

    /// Catalog over a JSON array of product records.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an array of product records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductRecord> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Catalog loaded from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Delay every lookup by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ProductCatalog for MockCatalog {
    #[instrument(skip_all, fields(id = %id))]
    async fn find_product_by_id(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductRecord>, CatalogError> {
        self.simulate_latency().await;
        let product = self.products.iter().find(|p| &p.id == id).cloned();
        debug!(found = product.is_some(), "Catalog lookup");
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        self.simulate_latency().await;
        Ok(self.products.to_vec())
    }
}
