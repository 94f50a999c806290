//! End-to-end cart flows through the storefront router.
//!
//! Each test drives the full router (session layer included) with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between requests
//! the way a browser would.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use sleepoutside_core::{ProductId, ProductRecord};
use sleepoutside_storefront::catalog::{CatalogError, MockCatalog, ProductCatalog};
use sleepoutside_storefront::config::StorefrontConfig;
use sleepoutside_storefront::state::AppState;
use tokio::sync::Notify;
use tower::ServiceExt;

/// A browser-like client holding one session cookie.
///
/// Clones share the cookie value at the time of cloning, like two tabs.
#[derive(Clone)]
struct Client {
    router: Router,
    cookie: Option<String>,
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    hx_trigger: Option<String>,
    body: String,
}

impl Client {
    fn new(catalog: Arc<dyn ProductCatalog>, cooldown: Duration) -> Self {
        let config = StorefrontConfig {
            catalog_latency: Duration::ZERO,
            add_to_cart_cooldown: cooldown,
            ..StorefrontConfig::default()
        };
        Self {
            router: sleepoutside_storefront::app(AppState::new(config, catalog)),
            cookie: None,
        }
    }

    fn builtin(cooldown: Duration) -> Self {
        Self::new(Arc::new(MockCatalog::builtin().unwrap()), cooldown)
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match form {
            Some(form) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_owned()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.router.clone().oneshot(request).await.expect("response");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let (location, hx_trigger) = {
            let header_value = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            };
            (
                header_value(header::LOCATION.as_str()),
                header_value("HX-Trigger"),
            )
        };
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        Reply {
            status,
            location,
            hx_trigger,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    async fn get(&mut self, uri: &str) -> Reply {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Reply {
        self.send(Method::POST, uri, Some(form)).await
    }
}

/// Catalog that is always unreachable.
struct DownCatalog;

#[async_trait]
impl ProductCatalog for DownCatalog {
    async fn find_product_by_id(
        &self,
        _id: &ProductId,
    ) -> Result<Option<ProductRecord>, CatalogError> {
        Err(CatalogError::Transport("connection refused".to_string()))
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        Err(CatalogError::Transport("connection refused".to_string()))
    }
}

/// Catalog whose next lookup, once armed, waits until the test releases it.
struct GatedCatalog {
    inner: MockCatalog,
    armed: AtomicBool,
    lookups: AtomicUsize,
    started: Notify,
    release: Notify,
}

impl GatedCatalog {
    fn new() -> Self {
        Self {
            inner: MockCatalog::builtin().unwrap(),
            armed: AtomicBool::new(false),
            lookups: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for GatedCatalog {
    async fn find_product_by_id(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductRecord>, CatalogError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.armed.swap(false, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.find_product_by_id(id).await
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        self.inner.list_products().await
    }
}

// =============================================================================
// Add to cart
// =============================================================================

#[tokio::test]
async fn test_add_twice_increments_single_line() {
    let mut client = Client::builtin(Duration::ZERO);

    let first = client.post("/cart/add", "id=1").await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.contains("Awesome Widget has been added to your cart!"));
    assert!(first.body.contains(">1</span>"));
    assert!(client.cookie.is_some());

    let second = client.post("/cart/add", "id=1").await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(second.body.contains(">2</span>"));
    assert!(second.body.contains("bounce"));

    let items = client.get("/cart/items").await;
    assert_eq!(items.body.matches("cart-card divider").count(), 1);
    assert!(items.body.contains("qty: 2"));
    assert!(items.body.contains("Total: $159.98"));
}

#[tokio::test(start_paused = true)]
async fn test_add_while_pending_is_dropped() {
    let mut client = Client::builtin(Duration::from_millis(500));

    let first = client.post("/cart/add", "id=1").await;
    assert_eq!(first.status, StatusCode::OK);

    let dropped = client.post("/cart/add", "id=1").await;
    assert_eq!(dropped.status, StatusCode::NO_CONTENT);
    assert!(dropped.body.is_empty());

    let count = client.get("/cart/count").await;
    assert!(count.body.contains(">1</span>"));

    tokio::time::sleep(Duration::from_millis(600)).await;

    let third = client.post("/cart/add", "id=1").await;
    assert_eq!(third.status, StatusCode::OK);
    assert!(third.body.contains(">2</span>"));
}

#[tokio::test]
async fn test_add_keeps_changes_made_during_lookup() {
    let catalog = Arc::new(GatedCatalog::new());
    let mut client = Client::new(catalog.clone(), Duration::ZERO);
    client.post("/cart/add", "id=2").await;

    catalog.arm();
    let mut adder = client.clone();
    let pending = tokio::spawn(async move { adder.post("/cart/add", "id=1").await });
    catalog.started.notified().await;

    let increased = client.post("/cart/quantity", "id=2&direction=increase").await;
    assert!(increased.body.contains("qty: 2"));

    catalog.release.notify_one();
    let added = pending.await.unwrap();
    assert_eq!(added.status, StatusCode::OK);
    assert!(added.body.contains(">3</span>"));

    let items = client.get("/cart/items").await;
    assert!(items.body.contains("qty: 2"));
    assert!(items.body.contains("Total: $359.97"));
}

#[tokio::test]
async fn test_first_visit_double_click_runs_one_lookup() {
    let catalog = Arc::new(GatedCatalog::new());
    let mut client = Client::new(catalog.clone(), Duration::ZERO);

    let listing = client.get("/products").await;
    assert_eq!(listing.status, StatusCode::OK);
    assert!(listing.body.contains(r#"hx-sync="this:drop""#));
    assert!(client.cookie.is_some());

    catalog.arm();
    let mut first_click = client.clone();
    let first = tokio::spawn(async move { first_click.post("/cart/add", "id=1").await });
    catalog.started.notified().await;

    let second = client.post("/cart/add", "id=1").await;
    assert_eq!(second.status, StatusCode::NO_CONTENT);
    assert_eq!(catalog.lookups(), 1);

    catalog.release.notify_one();
    let first = first.await.unwrap();
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_add_unknown_product_shows_not_found() {
    let mut client = Client::builtin(Duration::ZERO);

    let reply = client.post("/cart/add", "id=nope").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Product not found."));
    assert!(reply.body.contains("alert error"));
    assert!(reply.body.contains("display: none"));
}

#[tokio::test]
async fn test_add_with_catalog_down_shows_generic_error() {
    let mut client = Client::new(Arc::new(DownCatalog), Duration::ZERO);

    let reply = client.post("/cart/add", "id=1").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(
        reply
            .body
            .contains("An error occurred while adding the product to cart.")
    );
    assert!(!reply.body.contains("connection refused"));
}

// =============================================================================
// Quantity and removal
// =============================================================================

#[tokio::test]
async fn test_decrease_to_zero_empties_cart() {
    let mut client = Client::builtin(Duration::ZERO);
    client.post("/cart/add", "id=2").await;

    let reply = client.post("/cart/quantity", "id=2&direction=decrease").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Your cart is empty."));
    assert!(reply.body.contains("Cart Empty"));
    assert!(reply.body.contains("display: none"));

    let checkout = client.get("/checkout").await;
    assert_eq!(checkout.status, StatusCode::SEE_OTHER);
    assert_eq!(checkout.location.as_deref(), Some("/cart"));
}

#[tokio::test]
async fn test_increase_steps_quantity() {
    let mut client = Client::builtin(Duration::ZERO);
    client.post("/cart/add", "id=2").await;

    let reply = client.post("/cart/quantity", "id=2&direction=increase").await;
    assert!(reply.body.contains("qty: 2"));
    assert!(reply.body.contains("Total: $279.98"));
    assert!(reply.body.contains("Proceed to Checkout"));
}

#[tokio::test]
async fn test_declined_remove_keeps_item() {
    let mut client = Client::builtin(Duration::ZERO);
    client.post("/cart/add", "id=1").await;

    let dialog = client.get("/cart/remove/confirm?id=1").await;
    assert!(dialog.body.contains("Awesome Widget"));
    assert!(dialog.body.contains(r#"name="confirmed""#));

    let reply = client.post("/cart/remove", "id=1&confirmed=false").await;
    assert!(reply.body.contains("qty: 1"));
    assert!(reply.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_confirmed_remove_deletes_item() {
    let mut client = Client::builtin(Duration::ZERO);
    client.post("/cart/add", "id=1").await;
    client.post("/cart/add", "id=2").await;

    let reply = client.post("/cart/remove", "id=1&confirmed=true").await;
    assert!(!reply.body.contains("Awesome Widget"));
    assert!(reply.body.contains("Great Gadget"));
    assert!(reply.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_only_add_signals_cart_listeners() {
    let mut client = Client::builtin(Duration::ZERO);

    let added = client.post("/cart/add", "id=1").await;
    assert_eq!(added.hx_trigger.as_deref(), Some("cart-updated"));

    let stepped = client.post("/cart/quantity", "id=1&direction=increase").await;
    assert_eq!(stepped.status, StatusCode::OK);
    assert!(stepped.hx_trigger.is_none());

    let removed = client.post("/cart/remove", "id=1&confirmed=true").await;
    assert_eq!(removed.status, StatusCode::OK);
    assert!(removed.hx_trigger.is_none());
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_product_page_without_id() {
    let mut client = Client::builtin(Duration::ZERO);

    let reply = client.get("/product").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Product ID not specified in URL."));
}

#[tokio::test]
async fn test_product_page_shows_pricing() {
    let mut client = Client::builtin(Duration::ZERO);

    let reply = client.get("/product?id=1").await;
    assert!(reply.body.contains("Awesome Widget"));
    assert!(reply.body.contains("Save $20.00 (20% off!)"));
    assert!(reply.body.contains("$79.99"));
}

#[tokio::test]
async fn test_cart_page_for_new_visitor() {
    let mut client = Client::builtin(Duration::ZERO);

    let reply = client.get("/cart").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Your cart is empty."));
    assert!(reply.body.contains("Cart Empty"));
    assert!(reply.body.contains(r#"id="alert-container""#));
}

#[tokio::test]
async fn test_root_redirects_to_listing() {
    let mut client = Client::builtin(Duration::ZERO);

    let reply = client.get("/").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/products"));

    let listing = client.get("/products").await;
    assert!(listing.body.contains("Marmot Ajax Tent"));
}

#[tokio::test]
async fn test_product_page_unknown_and_unavailable() {
    let mut client = Client::builtin(Duration::ZERO);
    let unknown = client.get("/product?id=nope").await;
    assert!(unknown.body.contains("Product not found."));

    let mut down = Client::new(Arc::new(DownCatalog), Duration::ZERO);
    let failed = down.get("/product?id=1").await;
    assert_eq!(failed.status, StatusCode::OK);
    assert!(failed.body.contains("Error loading product details."));
}
