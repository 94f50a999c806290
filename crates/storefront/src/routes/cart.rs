//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation reloads the cart and re-renders all cart surfaces: the
//! swap target (line items) plus out-of-band fragments for the badge and the
//! checkout link. A page without one of those elements ignores its fragment.
//!
//! Each render emits fresh controls carrying their own `hx-*` attributes, so
//! handlers are rebound on every render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sleepoutside_core::{Cart, ProductId};
use tower_sessions::Session;
use tracing::{debug, error, instrument, warn};

use crate::cart::{
    BadgeView, CartView, CheckoutView, NotificationView, SessionCart, client_key,
};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Notification shown when the product lookup fails.
pub const ADD_FAILED_MESSAGE: &str = "An error occurred while adding the product to cart.";

/// Notification shown when the product does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Product not found.";

/// HTMX event fired after an add, for pages listing the cart items.
const CART_UPDATED_EVENT: &str = "cart-updated";

/// Empties the confirmation dialog container.
const CLOSE_MODAL: &str = r#"<div id="modal" hx-swap-oob="true"></div>"#;

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub badge_html: String,
    pub items_html: String,
    pub checkout_html: String,
}

/// Checkout summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub badge_html: String,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub badge: BadgeView,
    pub oob: bool,
}

/// Checkout link fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_link.html")]
pub struct CheckoutLinkTemplate {
    pub checkout: CheckoutView,
    pub oob: bool,
}

/// Notification fragment, appended to the alert container.
#[derive(Template, WebTemplate)]
#[template(path = "partials/notification.html")]
pub struct NotificationTemplate {
    pub notification: NotificationView,
}

/// Remove confirmation dialog fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/confirm_remove.html")]
pub struct ConfirmRemoveTemplate {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Fragment Composition
// =============================================================================

/// Several surfaces rendered into one HTMX response body.
#[derive(Debug, Default)]
pub struct Fragments {
    html: String,
}

impl Fragments {
    /// Start an empty response body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rendered template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn push(mut self, template: &impl Template) -> Result<Self> {
        self.html.push_str(&template.render()?);
        Ok(self)
    }

    /// Append literal markup.
    #[must_use]
    pub fn push_raw(mut self, html: &str) -> Self {
        self.html.push_str(html);
        self
    }

    /// Finish into an HTML response.
    #[must_use]
    pub fn into_html(self) -> Html<String> {
        Html(self.html)
    }
}

/// Render the badge for the page layout.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn badge_html(cart: &Cart) -> Result<String> {
    Ok(CartCountTemplate {
        badge: BadgeView::new(cart),
        oob: false,
    }
    .render()?)
}

/// Line items as the swap target, badge and checkout link out of band.
fn cart_surfaces(state: &AppState, cart: &Cart, badge: BadgeView) -> Result<Fragments> {
    Fragments::new()
        .push(&CartItemsTemplate {
            cart: CartView::new(cart, state.images()),
        })?
        .push(&CartCountTemplate { badge, oob: true })?
        .push(&CheckoutLinkTemplate {
            checkout: CheckoutView::new(cart),
            oob: true,
        })
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub id: String,
}

/// Quantity step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// Quantity delta for this direction.
    #[must_use]
    pub const fn delta(self) -> i64 {
        match self {
            Self::Increase => 1,
            Self::Decrease => -1,
        }
    }
}

/// Quantity step form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub id: String,
    pub direction: Direction,
}

/// Remove confirmation query.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub id: String,
}

/// Remove form data, posted from the confirmation dialog.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub id: String,
    /// False when the dialog was declined.
    #[serde(default)]
    pub confirmed: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> Result<CartShowTemplate> {
    let cart = cart.cart();

    Ok(CartShowTemplate {
        badge_html: badge_html(&cart)?,
        items_html: CartItemsTemplate {
            cart: CartView::new(&cart, state.images()),
        }
        .render()?,
        checkout_html: CheckoutLinkTemplate {
            checkout: CheckoutView::new(&cart),
            oob: false,
        }
        .render()?,
    })
}

/// Cart items fragment with out-of-band badge and checkout link (HTMX).
#[instrument(skip_all)]
pub async fn items(State(state): State<AppState>, cart: SessionCart) -> Result<Html<String>> {
    let cart = cart.cart();
    Ok(cart_surfaces(&state, &cart, BadgeView::new(&cart))?.into_html())
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(cart: SessionCart) -> CartCountTemplate {
    CartCountTemplate {
        badge: BadgeView::new(&cart.cart()),
        oob: false,
    }
}

/// Get checkout link (HTMX).
#[instrument(skip_all)]
pub async fn checkout_link(cart: SessionCart) -> CheckoutLinkTemplate {
    CheckoutLinkTemplate {
        checkout: CheckoutView::new(&cart.cart()),
        oob: false,
    }
}

/// Step a line item's quantity by one (HTMX).
///
/// No confirmation: stepping below one removes the line item.
#[instrument(skip(state, cart))]
pub async fn quantity(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Form(form): Form<QuantityForm>,
) -> Result<Html<String>> {
    let id = ProductId::new(form.id);
    let updated = cart
        .store_mut()
        .adjust_quantity(&id, form.direction.delta())?;
    cart.commit().await?;

    Ok(cart_surfaces(&state, &updated, BadgeView::new(&updated).with_bounce())?.into_html())
}

/// Show the remove confirmation dialog (HTMX).
#[instrument(skip(cart))]
pub async fn confirm_remove(cart: SessionCart, Query(query): Query<RemoveQuery>) -> Result<Response> {
    let id = ProductId::new(query.id);
    let Some(item) = cart.cart().get(&id).cloned() else {
        debug!(product_id = %id, "Remove requested for item not in cart");
        return Ok(Html(CLOSE_MODAL).into_response());
    };

    Ok(ConfirmRemoveTemplate {
        id: item.id.into_inner(),
        name: item.name,
    }
    .into_response())
}

/// Remove item from cart after confirmation (HTMX).
///
/// A declined confirmation re-renders without touching the cart.
#[instrument(skip(state, cart))]
pub async fn remove(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Form(form): Form<RemoveForm>,
) -> Result<Html<String>> {
    let updated = if form.confirmed {
        let updated = cart.store_mut().remove(&ProductId::new(form.id))?;
        cart.commit().await?;
        updated
    } else {
        debug!("Remove declined");
        cart.cart()
    };

    Ok(cart_surfaces(&state, &updated, BadgeView::new(&updated))?
        .push_raw(CLOSE_MODAL)
        .into_html())
}

/// Add one unit of a product to the cart (HTMX).
///
/// Only one lookup per client may be in flight; clicks arriving meanwhile are
/// dropped with `204 No Content`. The slot reopens after the configured
/// cooldown once the lookup settles.
///
/// The cart is read only after the lookup settles, so quantity changes and
/// removals made while it was pending are kept.
///
/// Returns the badge and checkout link out of band plus a notification.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let client = client_key(&session).await?;
    let guard = state.guards().guard_for(&client).await;
    let Some(in_flight) = guard.try_begin() else {
        debug!("Add to cart already in flight, dropping click");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let ttl = state.config().notification_ttl;
    let id = form.id.trim();
    let lookup = if id.is_empty() {
        Err(AppError::BadRequest("product id missing".to_string()))
    } else {
        state
            .catalog()
            .find_product_by_id(&ProductId::new(id))
            .await
            .map_err(AppError::from)
    };

    let mut cart = SessionCart::load(session).await?;
    let (updated, notification) = match lookup {
        Ok(Some(product)) => match cart.store_mut().add_or_increment(&product) {
            Ok(updated) => {
                cart.commit().await?;
                let message = format!("{} has been added to your cart!", product.name);
                (updated, NotificationView::success(message, ttl))
            }
            Err(e) => {
                error!(error = %e, "Failed to save cart");
                (cart.cart(), NotificationView::error(ADD_FAILED_MESSAGE, ttl))
            }
        },
        Ok(None) => {
            warn!(product_id = id, "Product not found");
            (cart.cart(), NotificationView::error(NOT_FOUND_MESSAGE, ttl))
        }
        Err(e) => {
            error!(error = %e, "Failed to add item to cart");
            (cart.cart(), NotificationView::error(ADD_FAILED_MESSAGE, ttl))
        }
    };
    in_flight.settle();

    let body = Fragments::new()
        .push(&CartCountTemplate {
            badge: BadgeView::new(&updated).with_bounce(),
            oob: true,
        })?
        .push(&CheckoutLinkTemplate {
            checkout: CheckoutView::new(&updated),
            oob: true,
        })?
        .push(&NotificationTemplate { notification })?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        body.into_html(),
    )
        .into_response())
}

/// Checkout summary, or back to the cart when it is empty.
#[instrument(skip_all)]
pub async fn checkout(State(state): State<AppState>, cart: SessionCart) -> Result<Response> {
    let cart = cart.cart();
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(CheckoutShowTemplate {
        badge_html: badge_html(&cart)?,
        cart: CartView::new(&cart, state.images()),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sleepoutside_core::{CartLineItem, Price, ProductRecord};

    use super::*;
    use crate::cart::ImagePaths;

    fn cart(lines: &[(&str, u32, u32)]) -> Cart {
        lines
            .iter()
            .map(|(id, cents, qty)| {
                CartLineItem::from_product(&ProductRecord::new(
                    ProductId::new(*id),
                    format!("Product {id}"),
                    Price::from_cents(*cents),
                ))
                .with_quantity(*qty)
            })
            .collect()
    }

    fn render_items(cart: &Cart) -> String {
        CartItemsTemplate {
            cart: CartView::new(cart, &ImagePaths::new("/static/images/")),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Increase.delta(), 1);
        assert_eq!(Direction::Decrease.delta(), -1);
    }

    #[test]
    fn test_items_fragment_renders_rows_and_total() {
        let html = render_items(&cart(&[("a", 1000, 2), ("b", 550, 1)]));

        assert!(html.contains("Product a"));
        assert!(html.contains("qty: 2"));
        assert!(html.contains("$20.00"));
        assert!(html.contains("Total: $25.50"));
        assert!(html.contains("decrease-qty"));
        assert!(html.contains("increase-qty"));
        assert!(html.contains("remove-item"));
    }

    #[test]
    fn test_items_fragment_empty_placeholder() {
        let html = render_items(&Cart::new());
        assert!(html.contains("Your cart is empty."));
        assert!(!html.contains("Total:"));
    }

    #[test]
    fn test_badge_fragment_hidden_when_empty() {
        let html = badge_html(&Cart::new()).unwrap();
        assert!(html.contains(r#"id="cart-count""#));
        assert!(html.contains("display: none"));
        assert!(html.contains("pulse"));
    }

    #[test]
    fn test_badge_fragment_oob_and_bounce() {
        let html = CartCountTemplate {
            badge: BadgeView::new(&cart(&[("a", 100, 2)])).with_bounce(),
            oob: true,
        }
        .render()
        .unwrap();

        assert!(html.contains(">2</span>"));
        assert!(html.contains("bounce"));
        assert!(html.contains("hx-swap-oob"));
        assert!(!html.contains("display: none"));
    }

    #[test]
    fn test_checkout_link_fragment() {
        let disabled = CheckoutLinkTemplate {
            checkout: CheckoutView::new(&Cart::new()),
            oob: false,
        }
        .render()
        .unwrap();
        assert!(disabled.contains("Cart Empty"));
        assert!(disabled.contains(r#"aria-disabled="true""#));

        let enabled = CheckoutLinkTemplate {
            checkout: CheckoutView::new(&cart(&[("a", 100, 1)])),
            oob: false,
        }
        .render()
        .unwrap();
        assert!(enabled.contains("Proceed to Checkout"));
        assert!(!enabled.contains("aria-disabled"));
    }

    #[test]
    fn test_remove_form_defaults_to_declined() {
        let form: RemoveForm = serde_json::from_str(r#"{"id":"1"}"#).unwrap();
        assert_eq!(form.id, "1");
        assert!(!form.confirmed);
    }
}
