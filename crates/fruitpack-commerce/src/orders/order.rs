//! Order types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checkout::PaymentMethod;
use crate::ids::{OrderId, OrderItemId, ProductId};
use crate::money::{decimal, Currency, Money};

/// Delivery status as reported by the backend.
///
/// Values the backend adds later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryStatus {
    /// Order placed and paid, awaiting a driver.
    #[default]
    Pending,
    /// Being prepared for delivery.
    Processing,
    /// On the way.
    Shipped,
    /// Driver marked it delivered.
    Delivered,
    /// Shopper confirmed delivery.
    Completed,
    /// Any other status string.
    Other(String),
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Processing => "processing",
            DeliveryStatus::Shipped => "shipped",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Completed => "completed",
            DeliveryStatus::Other(s) => s,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::Processing => "Processing",
            DeliveryStatus::Shipped => "Shipped",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Completed => "Completed",
            DeliveryStatus::Other(s) => s,
        }
    }

    /// Check if the order has reached the shopper.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Completed)
    }
}

impl From<String> for DeliveryStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => DeliveryStatus::Pending,
            "processing" => DeliveryStatus::Processing,
            "shipped" => DeliveryStatus::Shipped,
            "delivered" => DeliveryStatus::Delivered,
            "completed" => DeliveryStatus::Completed,
            _ => DeliveryStatus::Other(s),
        }
    }
}

impl From<&str> for DeliveryStatus {
    fn from(s: &str) -> Self {
        DeliveryStatus::from(s.to_string())
    }
}

impl From<DeliveryStatus> for String {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => PaymentStatus::Pending,
            "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<OrderItemId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    /// Unit price as a decimal amount.
    #[serde(deserialize_with = "decimal::deserialize")]
    pub price: f64,
}

impl OrderItem {
    /// `price * quantity` in the given currency.
    pub fn line_total(&self, currency: Currency) -> Money {
        Money::from_decimal(self.price, currency).saturating_multiply(i64::from(self.quantity))
    }
}

/// An order as served by the `/orders` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Order total as a decimal amount.
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub total: f64,
    /// Creation timestamp as sent by the backend (ISO 8601).
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Order total in the given currency.
    pub fn total_money(&self, currency: Currency) -> Money {
        Money::from_decimal(self.total, currency)
    }

    /// Payment method, if the backend sent a known one.
    pub fn method(&self) -> Option<PaymentMethod> {
        self.payment_method.as_deref()?.parse().ok()
    }

    /// Sum of item quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// The shopper may confirm receipt once the driver marked it delivered.
    pub fn can_confirm_delivery(&self) -> bool {
        self.delivery_status == DeliveryStatus::Delivered
    }

    /// A driver may claim an order that is still pending.
    pub fn can_claim(&self) -> bool {
        self.delivery_status == DeliveryStatus::Pending
    }

    /// A driver may mark an order delivered while it is shipped.
    pub fn can_mark_delivered(&self) -> bool {
        self.delivery_status == DeliveryStatus::Shipped
    }
}

/// Body of `PUT /orders/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: DeliveryStatus,
}

impl OrderStatusUpdate {
    pub fn delivered() -> Self {
        Self {
            status: DeliveryStatus::Delivered,
        }
    }
}
