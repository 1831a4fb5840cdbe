//! Product types.

use crate::ids::{CategoryId, ProductId};
use crate::money::{decimal, Currency, Money};
use serde::{Deserialize, Serialize};

/// A product as served by `GET /products/` and `GET /products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price as a decimal amount.
    #[serde(deserialize_with = "decimal::deserialize")]
    pub price: f64,
    /// Product description.
    #[serde(default)]
    pub description: Option<String>,
    /// Image filename, served under `products/images/{image}`.
    #[serde(default)]
    pub image: Option<String>,
    /// Absolute image URL, when the backend provides one.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Discount as a fraction (0.15 = 15% off).
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    pub discount: Option<f64>,
    /// Category this product belongs to.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Supplier name.
    #[serde(default)]
    pub supplier: Option<String>,
}

impl Product {
    /// Create a product with the required fields.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: None,
            image: None,
            image_url: None,
            discount: None,
            category_id: None,
            supplier: None,
        }
    }

    /// Unit price in the given currency.
    ///
    /// A negative or non-finite price from the backend counts as zero.
    pub fn unit_price(&self, currency: Currency) -> Money {
        if !self.price.is_finite() || self.price < 0.0 {
            tracing::warn!(
                product_id = %self.id,
                price = self.price,
                "invalid product price, using zero"
            );
            return Money::zero(currency);
        }
        Money::from_decimal(self.price, currency)
    }

    /// Capture the values a cart line keeps for this product.
    pub fn snapshot(&self, currency: Currency) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id.clone(),
            name: self.name.clone(),
            price: self.unit_price(currency),
            image_ref: self.image.clone(),
        }
    }

    /// Discount as a whole percentage, if any.
    pub fn discount_percent(&self) -> Option<f64> {
        self.discount
            .filter(|d| *d > 0.0)
            .map(|d| (d * 100.0).round())
    }

    /// Reference used to resolve the product image.
    pub fn image_ref(&self) -> Option<&str> {
        self.image.as_deref().or(self.image_url.as_deref())
    }
}

/// Values copied from a product when it is added to the cart.
///
/// Name and price are fixed at capture time and never re-read from the
/// catalog while the cart line exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub product_id: ProductId,
    /// Display name at capture time.
    pub name: String,
    /// Unit price at capture time.
    pub price: Money,
    /// Image reference.
    pub image_ref: Option<String>,
}

impl ProductSnapshot {
    /// Create a snapshot directly.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            image_ref: None,
        }
    }

    /// Set the image reference.
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}
