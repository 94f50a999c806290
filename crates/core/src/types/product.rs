//! Catalog product records.
//!
//! A [`ProductRecord`] is owned by the catalog; the storefront only reads it.
//! Field names follow the catalog's JSON (`PascalCase`), and every field other
//! than `Id`, `Name` and `FinalPrice` may be absent.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as returned by the catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html_simple: Option<String>,
    /// Responsive image variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ProductImages>,
    /// Single flat image reference, used by listing data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ProductColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_retail_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<Price>,
    pub final_price: Price,
}

/// Product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Brand {
    pub name: String,
}

/// Responsive image variants for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_medium: Option<String>,
}

/// A color option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductColor {
    pub color_name: String,
}

/// Image URLs resolved for a `<picture>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    /// Source for wide screens; empty when unknown.
    pub large: String,
    /// Source for medium screens; empty when unknown.
    pub medium: String,
    /// `<img src>` fallback: flat image, then medium, then large.
    pub fallback: String,
}

/// Discount relative to the highest reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub amount: Price,
    /// Whole percent, rounded half up.
    pub percent: u32,
}

/// Reference prices and discount for the product detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingSummary {
    /// Suggested retail price, falling back to list then final price.
    pub suggested: Price,
    /// List price, falling back to the suggested price.
    pub list: Price,
    pub final_price: Price,
    pub discount: Option<Discount>,
}

impl PricingSummary {
    /// Whether an "MSRP" line should be shown next to the final price.
    #[must_use]
    pub fn show_msrp(&self) -> bool {
        self.discount.is_some() && self.suggested != self.final_price
    }

    /// Whether a separate "List" line should be shown.
    #[must_use]
    pub fn show_list(&self) -> bool {
        self.discount.is_some() && self.list != self.final_price && self.list != self.suggested
    }
}

impl ProductRecord {
    /// Create a record with only the required fields set.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, final_price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            brand: None,
            description_html_simple: None,
            images: None,
            image: None,
            colors: Vec::new(),
            suggested_retail_price: None,
            list_price: None,
            final_price,
        }
    }

    /// Brand name, or an empty string.
    #[must_use]
    pub fn brand_name(&self) -> &str {
        self.brand.as_ref().map_or("", |b| b.name.as_str())
    }

    /// Description, or an empty string.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description_html_simple.as_deref().unwrap_or("")
    }

    /// Resolve the image variants for display.
    #[must_use]
    pub fn image_set(&self) -> ImageSet {
        let images = self.images.clone().unwrap_or_default();
        let large = images.primary_large.unwrap_or_default();
        let medium = images.primary_medium.unwrap_or_default();
        let fallback = [self.image.as_deref(), Some(medium.as_str()), Some(large.as_str())]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
            .to_owned();

        ImageSet {
            large,
            medium,
            fallback,
        }
    }

    /// Compute reference prices and the discount, if any.
    ///
    /// Zero reference prices count as absent.
    #[must_use]
    pub fn pricing(&self) -> PricingSummary {
        let non_zero = |p: Option<Price>| p.filter(|p| !p.is_zero());
        let final_price = self.final_price;
        let suggested = non_zero(self.suggested_retail_price)
            .or_else(|| non_zero(self.list_price))
            .unwrap_or(final_price);
        let list = non_zero(self.list_price).unwrap_or(suggested);

        let discount = (suggested > final_price || list > final_price).then(|| {
            let amount = suggested
                .saturating_sub(final_price)
                .max(list.saturating_sub(final_price));
            let reference = suggested.max(list).amount();
            let percent = (amount.amount() / reference * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
                .unwrap_or(0);
            Discount { amount, percent }
        });

        PricingSummary {
            suggested,
            list,
            final_price,
            discount,
        }
    }
}
