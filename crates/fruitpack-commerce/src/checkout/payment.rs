//! Payment methods and the payment sheet seam.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CommerceError;

/// How the shopper pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment confirmed through a payment sheet.
    Card,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    /// All methods in display order.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Card, PaymentMethod::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash on delivery",
        }
    }

    /// Whether the order must be confirmed through a payment sheet.
    pub fn requires_payment_sheet(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(CommerceError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of presenting a payment sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment confirmed.
    Completed,
    /// Shopper dismissed the sheet.
    Canceled,
    /// The payment provider reported a failure.
    Failed(String),
}

/// A third-party payment UI.
///
/// The sheet is initialized with the payment-confirmation handle returned
/// by the backend, then presented to the shopper.
pub trait PaymentSheet {
    /// Prepare the sheet for one payment.
    fn initialize(&mut self, client_secret: &str, return_url: &str) -> Result<(), CommerceError>;

    /// Show the sheet and wait for the shopper.
    fn present(&mut self) -> PaymentOutcome;
}
