//! Cart line items.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, ProductColor, ProductId, ProductImages, ProductRecord};

/// Label shown when a line item carries no color.
pub const NO_COLOR_LABEL: &str = "N/A";

/// One row in the cart: a product snapshot plus a quantity.
///
/// Display fields and `FinalPrice` are copied from the [`ProductRecord`] at the
/// time the item was added and are never re-fetched.
///
/// ## Quantity
///
/// Always at least 1. A stored quantity that is absent, `null` or `0` loads
/// as 1; decrementing below 1 removes the row instead (see
/// [`Cart::adjust_quantity`](crate::Cart::adjust_quantity)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ProductImages>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ProductColor>,
    pub final_price: Price,
    #[serde(default = "default_quantity", deserialize_with = "positive_quantity")]
    quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

fn positive_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let quantity = Option::<u32>::deserialize(deserializer)?;
    Ok(quantity.filter(|q| *q > 0).unwrap_or(1))
}

impl CartLineItem {
    /// Snapshot a product into a new line item with quantity 1.
    #[must_use]
    pub fn from_product(product: &ProductRecord) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            images: product.images.clone(),
            colors: product.colors.clone(),
            final_price: product.final_price,
            quantity: 1,
        }
    }

    /// Replace the quantity, clamping to at least 1.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Units of this product in the cart.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// `FinalPrice × Quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.final_price.times(self.quantity)
    }

    /// First color name, or `"N/A"`.
    #[must_use]
    pub fn color_label(&self) -> &str {
        self.colors
            .first()
            .map_or(NO_COLOR_LABEL, |c| c.color_name.as_str())
    }

    /// Best image reference: flat image, then medium, then large.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        let images = self.images.as_ref();
        self.image
            .as_deref()
            .or_else(|| images.and_then(|i| i.primary_medium.as_deref()))
            .or_else(|| images.and_then(|i| i.primary_large.as_deref()))
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_copies_fields() {
        let mut product = ProductRecord::new(ProductId::new("1"), "Awesome Widget", Price::from_cents(7999));
        product.colors = vec![ProductColor {
            color_name: "Forest Green".to_owned(),
        }];

        let item = CartLineItem::from_product(&product);
        assert_eq!(item.id, product.id);
        assert_eq!(item.name, "Awesome Widget");
        assert_eq!(item.final_price, product.final_price);
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.color_label(), "Forest Green");
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        let item: CartLineItem =
            serde_json::from_str(r#"{"Id":"2","Name":"Great Gadget","FinalPrice":139.99}"#).unwrap();
        assert_eq!(item.quantity(), 1);

        let item: CartLineItem =
            serde_json::from_str(r#"{"Id":"2","FinalPrice":139.99,"Quantity":null}"#).unwrap();
        assert_eq!(item.quantity(), 1);

        let item: CartLineItem =
            serde_json::from_str(r#"{"Id":"2","FinalPrice":139.99,"Quantity":0}"#).unwrap();
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let item: CartLineItem = serde_json::from_str(
            r#"{"Id":"1","Name":"Awesome Widget","Brand":{"Name":"WidgetCo"},"ListPrice":89.99,"FinalPrice":79.99,"Quantity":3}"#,
        )
        .unwrap();
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.line_total(), Price::from_cents(23997));
    }

    #[test]
    fn test_color_label_defaults() {
        let item = CartLineItem::from_product(&ProductRecord::new(
            ProductId::new("t1"),
            "Marmot Ajax Tent",
            Price::from_cents(19999),
        ));
        assert_eq!(item.color_label(), NO_COLOR_LABEL);
    }

    #[test]
    fn test_image_ref_fallback_chain() {
        let mut item = CartLineItem::from_product(&ProductRecord::new(
            ProductId::new("1"),
            "Awesome Widget",
            Price::from_cents(7999),
        ));
        assert_eq!(item.image_ref(), None);

        item.images = Some(ProductImages {
            primary_large: Some("large.jpg".to_owned()),
            primary_medium: None,
        });
        assert_eq!(item.image_ref(), Some("large.jpg"));

        item.image = Some("flat.jpg".to_owned());
        assert_eq!(item.image_ref(), Some("flat.jpg"));
    }

    #[test]
    fn test_with_quantity_clamps() {
        let item = CartLineItem::from_product(&ProductRecord::new(
            ProductId::new("1"),
            "Awesome Widget",
            Price::from_cents(1000),
        ))
        .with_quantity(0);
        assert_eq!(item.quantity(), 1);
    }
}
