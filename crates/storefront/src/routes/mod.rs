//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to product listing
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /product?id=            - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Line items + out-of-band badge and checkout link
//! GET  /cart/count             - Cart count badge (fragment)
//! GET  /cart/checkout-link     - Checkout call-to-action (fragment)
//! POST /cart/add               - Add one unit (badge, checkout link, notification)
//! POST /cart/quantity          - Step quantity up or down (returns cart surfaces)
//! GET  /cart/remove/confirm    - Remove confirmation dialog (fragment)
//! POST /cart/remove            - Remove item once confirmed (returns cart surfaces)
//!
//! # Checkout
//! GET  /checkout               - Order summary, or redirect to cart when empty
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
        .route("/checkout-link", get(cart::checkout_link))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::quantity))
        .route("/remove/confirm", get(cart::confirm_remove))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        // Product routes
        .route("/products", get(products::index))
        .route("/product", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout summary
        .route("/checkout", get(cart::checkout))
}
