//! Product type.

use crate::ids::ProductId;
use crate::price::try_parse_lower_price;
use serde::{Deserialize, Serialize};

/// A product as listed by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image reference.
    #[serde(default)]
    pub image: String,
    /// Price range text, `"<symbol><min> - <symbol><max>"`.
    #[serde(default)]
    pub price_range: String,
    /// Discount percentage (>= 0).
    #[serde(default)]
    pub discount: f64,
    /// Average rating (>= 0).
    #[serde(default)]
    pub rating: f64,
}

impl Product {
    /// Create a product with no discount and no rating.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price_range: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            price_range: price_range.into(),
            discount: 0.0,
            rating: 0.0,
        }
    }

    /// Set the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the discount percentage.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount.max(0.0);
        self
    }

    /// Set the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating.max(0.0);
        self
    }

    /// Lower bound of the price range, if it parses.
    pub fn lower_price(&self) -> Option<f64> {
        try_parse_lower_price(&self.price_range)
    }

    /// Whether a discount badge applies.
    pub fn has_discount(&self) -> bool {
        self.discount > 0.0
    }
}
