//! Display models for the cart surfaces.
//!
//! Each surface (cart list, badge, checkout link, notification) is computed
//! from a freshly loaded [`Cart`] on every render.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use sleepoutside_core::{Cart, CartLineItem, ProductId};

/// Matches a leading `images/`, `../images/`, `../../images/`, ... prefix.
static IMAGE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.\./)*images/").expect("Invalid regex"));

/// Label for the disabled checkout call-to-action.
pub const CHECKOUT_EMPTY_LABEL: &str = "Cart Empty";

/// Label for the enabled checkout call-to-action.
pub const CHECKOUT_READY_LABEL: &str = "Proceed to Checkout";

/// Rewrites relative image paths onto the static asset prefix.
#[derive(Debug, Clone)]
pub struct ImagePaths {
    base: String,
}

impl ImagePaths {
    /// Create a rewriter for `base` (e.g. `/static/images/`).
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// Normalize an image reference. Absolute URLs pass through unchanged.
    #[must_use]
    pub fn normalize(&self, reference: &str) -> String {
        IMAGE_PREFIX_RE
            .replace(reference, regex::NoExpand(&self.base))
            .into_owned()
    }
}

/// Link to a product's detail page.
#[must_use]
pub fn product_link(id: &ProductId) -> String {
    format!("/product?id={}", urlencoding::encode(id.as_str()))
}

/// One cart row.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub link: String,
    pub image_url: String,
    pub color: String,
    pub quantity: u32,
    pub line_total: String,
    pub confirm_url: String,
}

impl CartItemView {
    fn new(item: &CartLineItem, images: &ImagePaths) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            link: product_link(&item.id),
            image_url: item.image_ref().map(|r| images.normalize(r)).unwrap_or_default(),
            color: item.color_label().to_string(),
            quantity: item.quantity(),
            line_total: item.line_total().display(),
            confirm_url: format!(
                "/cart/remove/confirm?id={}",
                urlencoding::encode(item.id.as_str())
            ),
        }
    }
}

/// The cart line-item list with its total row.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Sum of line totals, rounded for display.
    pub total: String,
}

impl CartView {
    /// Project `cart` into rows.
    #[must_use]
    pub fn new(cart: &Cart, images: &ImagePaths) -> Self {
        Self {
            items: cart.iter().map(|item| CartItemView::new(item, images)).collect(),
            total: cart.total().display(),
        }
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The cart count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeView {
    /// Total units across all line items.
    pub count: u64,
    /// Hidden when the cart holds no units.
    pub hidden: bool,
    /// Bounce cue, played after quantity changes and adds.
    pub bounce: bool,
}

impl BadgeView {
    /// Badge for `cart`.
    #[must_use]
    pub fn new(cart: &Cart) -> Self {
        let count = cart.unit_count();
        Self {
            count,
            hidden: count == 0,
            bounce: false,
        }
    }

    /// Add the bounce cue.
    #[must_use]
    pub const fn with_bounce(mut self) -> Self {
        self.bounce = true;
        self
    }
}

/// The checkout call-to-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutView {
    pub enabled: bool,
    pub label: &'static str,
}

impl CheckoutView {
    /// Checkout affordance for `cart`.
    #[must_use]
    pub fn new(cart: &Cart) -> Self {
        if cart.is_empty() {
            Self {
                enabled: false,
                label: CHECKOUT_EMPTY_LABEL,
            }
        } else {
            Self {
                enabled: true,
                label: CHECKOUT_READY_LABEL,
            }
        }
    }
}

/// Notification flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// CSS class for the alert.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message appended to the notification container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub message: String,
    pub kind: NotificationKind,
    /// Milliseconds before the alert removes itself.
    pub ttl_ms: u128,
}

impl NotificationView {
    /// Success notification.
    #[must_use]
    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
            ttl_ms: ttl.as_millis(),
        }
    }

    /// Error notification.
    #[must_use]
    pub fn error(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            ttl_ms: ttl.as_millis(),
        }
    }
}
