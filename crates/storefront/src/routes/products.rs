//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use sleepoutside_core::{ImageSet, ProductId, ProductRecord};
use tracing::{error, instrument, warn};

use crate::cart::{ImagePaths, SessionCart, views::product_link};
use crate::error::Result;
use crate::routes::cart::{NOT_FOUND_MESSAGE, badge_html};
use crate::state::AppState;

/// Message shown when the detail page is opened without an id.
pub const MISSING_ID_MESSAGE: &str = "Product ID not specified in URL.";

/// Message shown when the detail lookup fails.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading product details.";

/// Message shown when the listing cannot be loaded.
pub const LIST_FAILED_MESSAGE: &str = "Error loading products.";

/// Product card data for the listing.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub link: String,
    pub image_url: String,
    pub price: String,
}

impl ProductCardView {
    fn new(product: &ProductRecord, images: &ImagePaths) -> Self {
        let image = product.image_set();
        let image_url = [image.medium.as_str(), image.fallback.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(|s| images.normalize(s))
            .unwrap_or_default();

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand_name().to_string(),
            link: product_link(&product.id),
            image_url,
            price: product.final_price.display(),
        }
    }
}

/// Product detail data for templates.
///
/// Optional lines are empty strings when they should not be shown.
#[derive(Clone, Default)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub color: String,
    pub images: ImageSet,
    pub final_price: String,
    pub msrp: String,
    pub list: String,
    pub discount_flag: String,
    pub discounted: bool,
}

impl ProductDetailView {
    fn new(product: &ProductRecord, images: &ImagePaths) -> Self {
        let set = product.image_set();
        let pricing = product.pricing();

        let msrp = if pricing.show_msrp() {
            pricing.suggested.display()
        } else {
            String::new()
        };
        let list = if pricing.show_list() {
            pricing.list.display()
        } else {
            String::new()
        };
        let discount_flag = pricing
            .discount
            .map(|d| format!("Save {} ({}% off!)", d.amount.display(), d.percent))
            .unwrap_or_default();

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand_name().to_string(),
            description: product.description().to_string(),
            color: product
                .colors
                .first()
                .map(|c| c.color_name.clone())
                .unwrap_or_default(),
            images: ImageSet {
                large: images.normalize(&set.large),
                medium: images.normalize(&set.medium),
                fallback: images.normalize(&set.fallback),
            },
            final_price: pricing.final_price.display(),
            msrp,
            list,
            discounted: pricing.discount.is_some(),
            discount_flag,
        }
    }
}

/// Product detail query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub badge_html: String,
    pub products: Vec<ProductCardView>,
    pub error: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub badge_html: String,
    pub found: bool,
    pub product: ProductDetailView,
    pub message: String,
}

impl ProductShowTemplate {
    fn message(badge_html: String, message: &str) -> Self {
        Self {
            badge_html,
            found: false,
            product: ProductDetailView::default(),
            message: message.to_string(),
        }
    }
}

/// Display product listing page.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, cart: SessionCart) -> Result<ProductsIndexTemplate> {
    cart.ensure_visitor().await?;
    let badge_html = badge_html(&cart.cart())?;

    let (products, error) = match state.catalog().list_products().await {
        Ok(products) => (
            products
                .iter()
                .map(|p| ProductCardView::new(p, state.images()))
                .collect(),
            String::new(),
        ),
        Err(e) => {
            error!(error = %e, "Failed to list products");
            (Vec::new(), LIST_FAILED_MESSAGE.to_string())
        }
    };

    Ok(ProductsIndexTemplate {
        badge_html,
        products,
        error,
    })
}

/// Display product detail page.
#[instrument(skip(state, cart))]
pub async fn show(
    State(state): State<AppState>,
    cart: SessionCart,
    Query(query): Query<ProductQuery>,
) -> Result<ProductShowTemplate> {
    cart.ensure_visitor().await?;
    let badge_html = badge_html(&cart.cart())?;

    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return Ok(ProductShowTemplate::message(badge_html, MISSING_ID_MESSAGE));
    };

    match state.catalog().find_product_by_id(&ProductId::new(id.trim())).await {
        Ok(Some(product)) => Ok(ProductShowTemplate {
            badge_html,
            found: true,
            product: ProductDetailView::new(&product, state.images()),
            message: String::new(),
        }),
        Ok(None) => {
            warn!(product_id = %id, "Product not found");
            Ok(ProductShowTemplate::message(badge_html, NOT_FOUND_MESSAGE))
        }
        Err(e) => {
            error!(error = %e, "Failed to load product");
            Ok(ProductShowTemplate::message(badge_html, LOAD_FAILED_MESSAGE))
        }
    }
}
