//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{GuardRegistry, ImagePaths};
use crate::catalog::ProductCatalog;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog collaborator and the per-client add-to-cart
/// guards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn ProductCatalog>,
    guards: GuardRegistry,
    images: ImagePaths,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product lookup collaborator
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Arc<dyn ProductCatalog>) -> Self {
        let guards = GuardRegistry::new(config.add_to_cart_cooldown);
        let images = ImagePaths::new(config.image_base_path.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                guards,
                images,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the add-to-cart guard registry.
    #[must_use]
    pub fn guards(&self) -> &GuardRegistry {
        &self.inner.guards
    }

    /// Get a reference to the image path rewriter.
    #[must_use]
    pub fn images(&self) -> &ImagePaths {
        &self.inner.images
    }
}
