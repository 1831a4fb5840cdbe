//! Checkout request and response payloads.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::checkout::{CheckoutForm, PaymentMethod};
use crate::ids::{OrderId, ProductId};
use crate::money::{decimal, Currency, Money};
use crate::CommerceError;

/// One line of the checkout payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price as a decimal amount.
    pub price: f64,
}

impl From<&CartLine> for CheckoutItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price.to_decimal(),
        }
    }
}

/// Body of `POST /cart/checkout/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    /// Project the cart and a validated form into a request.
    ///
    /// Items come from the cart line snapshots in cart order.
    pub fn from_cart(form: &CheckoutForm, cart: &Cart) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        form.validate()?;

        let payment_method = form
            .payment_method
            .ok_or_else(|| CommerceError::CheckoutIncomplete("payment method".to_string()))?;
        let location = form
            .location
            .ok_or_else(|| CommerceError::CheckoutIncomplete("delivery location".to_string()))?;

        Ok(Self {
            full_name: form.full_name.trim().to_string(),
            address: form.address.trim().to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            phone: form.phone.trim().to_string(),
            payment_method,
            items: cart.lines().iter().map(CheckoutItem::from).collect(),
        })
    }

    /// Sum of `price * quantity` over the items.
    pub fn total(&self, currency: Currency) -> Money {
        self.items.iter().fold(Money::zero(currency), |acc, item| {
            let line = Money::from_decimal(item.price, currency)
                .saturating_multiply(i64::from(item.quantity));
            acc.saturating_add(&line)
        })
    }

    /// Serialize to the JSON body.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Successful checkout response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    /// Payment-confirmation handle for card payments.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Amount the payment provider will charge.
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    pub amount: Option<f64>,
}

impl CheckoutReceipt {
    /// Client secret, if the backend sent a non-empty one.
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref().filter(|s| !s.is_empty())
    }
}
